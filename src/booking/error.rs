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
use crate::booking::interval::TimeInterval;
use crate::booking::reservation::ReservationId;
use std::fmt;
use thiserror::Error;

/// Every way the booking core can turn a request down. None of these are
/// fatal; the command layer decides how to present them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
	#[error("missing required field(s): {}", .0.join(", "))]
	IncompleteFields(Vec<&'static str>),

	#[error("unknown room: {0}")]
	UnknownRoom(String),

	#[error("invalid {field}: {value:?}")]
	Malformed { field: &'static str, value: String },

	#[error("end time {end} must be after start time {start}")]
	InvalidTimeRange { start: String, end: String },

	#[error("room is already booked by {}", ConflictList(.0))]
	RoomConflict(Vec<ConflictInfo>),

	#[error("no reservation with id {0}")]
	NotFound(ReservationId),

	#[error("no reservation ids left to assign")]
	IdsExhausted,
}

/// Identifies a reservation that blocked an admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictInfo {
	pub id: ReservationId,
	pub title: String,
	pub interval: TimeInterval,
}

impl fmt::Display for ConflictInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{} \"{}\" ({})", self.id, self.title, self.interval)
	}
}

struct ConflictList<'a>(&'a [ConflictInfo]);

impl fmt::Display for ConflictList<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, conflict) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{}", conflict)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::time::{parse_date, parse_time};

	#[test]
	fn test_incomplete_fields_message() {
		let err = BookingError::IncompleteFields(vec!["title", "room"]);
		assert_eq!(err.to_string(), "missing required field(s): title, room");
	}

	#[test]
	fn test_conflict_message_names_blockers() {
		let interval = TimeInterval::new(
			parse_date("2024-06-01").unwrap(),
			parse_time("09:00").unwrap(),
			parse_time("09:30").unwrap(),
		)
		.unwrap();

		let err = BookingError::RoomConflict(vec![
			ConflictInfo {
				id: ReservationId::new(1),
				title: "Standup".to_string(),
				interval,
			},
			ConflictInfo {
				id: ReservationId::new(4),
				title: "Retro".to_string(),
				interval,
			},
		]);

		assert_eq!(
			err.to_string(),
			"room is already booked by #1 \"Standup\" (2024-06-01 09:00-09:30), \
			#4 \"Retro\" (2024-06-01 09:00-09:30)"
		);
	}
}
