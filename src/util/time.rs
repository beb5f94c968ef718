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

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a calendar day in the "YYYY-MM-DD" format.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).ok()
}

/// Parses a wall-clock time in the "HH:MM" format. "HH:MM:SS" is tolerated
/// for hand-edited data files, but seconds are dropped since bookings only
/// carry minute precision.
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
	let s = time_str.trim();
	let time = NaiveTime::parse_from_str(s, TIME_FORMAT)
		.or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
		.ok()?;

	NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
}

pub fn today() -> NaiveDate {
	Local::now().date_naive()
}

/// Length of a booking, designed for convenient printing in human-readable
/// terms, e.g. "1h 30m".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
	total_minutes: i64,
}

impl Span {
	pub fn between(start: NaiveTime, end: NaiveTime) -> Span {
		Span {
			total_minutes: (end - start).num_minutes().max(0),
		}
	}

	pub fn total_minutes(&self) -> i64 {
		self.total_minutes
	}
}

impl fmt::Display for Span {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let hours = self.total_minutes() / 60;
		let minutes = self.total_minutes() % 60;

		let mut components = Vec::new();
		if hours > 0 {
			components.push(format!("{}h", hours));
		}
		if minutes > 0 || hours == 0 {
			components.push(format!("{}m", minutes));
		}

		write!(f, "{}", components.join(" "))
	}
}
