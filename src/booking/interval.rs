/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::booking::error::BookingError;
use crate::util::time::{Span, DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;
use std::fmt;

/// A half-open span `[start, end)` of wall-clock time on a single day. Two
/// bookings that merely touch (one ends at 10:00, the next starts at 10:00)
/// do not overlap.
///
/// Intervals order by date, then start, then end, which is the order used
/// whenever bookings are displayed.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct TimeInterval {
	date: NaiveDate,
	start: NaiveTime,
	end: NaiveTime,
}

impl TimeInterval {
	pub fn new(
		date: NaiveDate,
		start: NaiveTime,
		end: NaiveTime,
	) -> Result<Self, BookingError> {
		if end <= start {
			return Err(BookingError::InvalidTimeRange {
				start: start.format(TIME_FORMAT).to_string(),
				end: end.format(TIME_FORMAT).to_string(),
			});
		}

		Ok(Self { date, start, end })
	}

	pub fn date(&self) -> NaiveDate {
		self.date
	}

	pub fn start(&self) -> NaiveTime {
		self.start
	}

	pub fn end(&self) -> NaiveTime {
		self.end
	}

	pub fn span(&self) -> Span {
		Span::between(self.start, self.end)
	}

	/// Symmetric; intervals on different days never overlap.
	pub fn overlaps(&self, other: &TimeInterval) -> bool {
		self.date == other.date
			&& self.start < other.end
			&& other.start < self.end
	}
}

impl PartialOrd for TimeInterval {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for TimeInterval {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.date, self.start, self.end).cmp(&(
			other.date,
			other.start,
			other.end,
		))
	}
}

impl fmt::Display for TimeInterval {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {}-{}",
			self.date.format(DATE_FORMAT),
			self.start.format(TIME_FORMAT),
			self.end.format(TIME_FORMAT)
		)
	}
}
