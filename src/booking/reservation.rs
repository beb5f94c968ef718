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
use crate::booking::interval::TimeInterval;
use crate::util::time::{parse_time, TIME_FORMAT};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The bookable rooms. The set is fixed; adding a room is a code change.
#[derive(
	Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Room {
	#[serde(rename = "Ruang Edellweis")]
	Edellweis,
	#[serde(rename = "Ruang Zoom Cempaka")]
	ZoomCempaka,
	#[serde(rename = "Ruang Anggrek")]
	Anggrek,
	#[serde(rename = "Ruang Melati")]
	Melati,
}

impl Room {
	pub fn all() -> [Room; 4] {
		[Room::Edellweis, Room::ZoomCempaka, Room::Anggrek, Room::Melati]
	}

	pub fn name(&self) -> &'static str {
		match self {
			Room::Edellweis => "Ruang Edellweis",
			Room::ZoomCempaka => "Ruang Zoom Cempaka",
			Room::Anggrek => "Ruang Anggrek",
			Room::Melati => "Ruang Melati",
		}
	}

	/// Short form accepted on the command line
	pub fn slug(&self) -> &'static str {
		match self {
			Room::Edellweis => "edellweis",
			Room::ZoomCempaka => "cempaka",
			Room::Anggrek => "anggrek",
			Room::Melati => "melati",
		}
	}
}

impl FromStr for Room {
	type Err = BookingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim();
		Room::all()
			.into_iter()
			.find(|room| {
				room.name().eq_ignore_ascii_case(wanted)
					|| room.slug().eq_ignore_ascii_case(wanted)
			})
			.ok_or_else(|| BookingError::UnknownRoom(wanted.to_string()))
	}
}

impl fmt::Display for Room {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

#[derive(
	Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReservationId(u64);

impl ReservationId {
	pub fn new(id: u64) -> Self {
		Self(id)
	}

	pub fn value(&self) -> u64 {
		self.0
	}
}

impl FromStr for ReservationId {
	type Err = BookingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		s.strip_prefix('#')
			.unwrap_or(s)
			.parse::<u64>()
			.map(ReservationId)
			.map_err(|_| BookingError::Malformed {
				field: "id",
				value: s.to_string(),
			})
	}
}

impl fmt::Display for ReservationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// An admitted booking. Reservations are never edited; the only way to
/// change one is to delete it and book again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReservationRecord", into = "ReservationRecord")]
pub struct Reservation {
	id: ReservationId,
	title: String,
	room: Room,
	interval: TimeInterval,
}

impl Reservation {
	pub(super) fn new(
		id: ReservationId,
		title: String,
		room: Room,
		interval: TimeInterval,
	) -> Self {
		Self {
			id,
			title,
			room,
			interval,
		}
	}

	pub fn id(&self) -> ReservationId {
		self.id
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn room(&self) -> Room {
		self.room
	}

	pub fn interval(&self) -> &TimeInterval {
		&self.interval
	}
}

impl fmt::Display for Reservation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"#{} {} | {} | {}",
			self.id, self.interval, self.room, self.title
		)
	}
}

/// On-disk shape of a reservation. Times are kept as "HH:MM" strings so the
/// data file stays pleasant to read and edit by hand.
#[derive(Serialize, Deserialize)]
struct ReservationRecord {
	id: ReservationId,
	title: String,
	room: Room,
	date: NaiveDate,
	start_time: String,
	end_time: String,
}

impl TryFrom<ReservationRecord> for Reservation {
	type Error = BookingError;

	fn try_from(record: ReservationRecord) -> Result<Self, Self::Error> {
		let start = stored_time("start_time", &record.start_time)?;
		let end = stored_time("end_time", &record.end_time)?;

		Ok(Reservation {
			id: record.id,
			title: record.title,
			room: record.room,
			interval: TimeInterval::new(record.date, start, end)?,
		})
	}
}

impl From<Reservation> for ReservationRecord {
	fn from(reservation: Reservation) -> Self {
		let interval = reservation.interval;
		ReservationRecord {
			id: reservation.id,
			title: reservation.title,
			room: reservation.room,
			date: interval.date(),
			start_time: interval.start().format(TIME_FORMAT).to_string(),
			end_time: interval.end().format(TIME_FORMAT).to_string(),
		}
	}
}

fn stored_time(
	field: &'static str,
	value: &str,
) -> Result<NaiveTime, BookingError> {
	parse_time(value).ok_or_else(|| BookingError::Malformed {
		field,
		value: value.to_string(),
	})
}

/// A booking request as typed by a user, before any validation. Consumed by
/// admission, which either turns it into a Reservation or rejects it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewReservation {
	pub title: String,
	pub room: String,
	pub date: String,
	pub start_time: String,
	pub end_time: String,
}

/// Everything the storage layer needs to persist and later restore a store.
/// `next_id` is the id high-water mark, kept so that ids of deleted
/// reservations are not handed out again after a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub next_id: u64,
	pub reservations: Vec<Reservation>,
}

impl Snapshot {
	pub fn new(reservations: Vec<Reservation>) -> Self {
		Self {
			next_id: 0,
			reservations,
		}
	}

	/// Ids carried by more than one record, in ascending order. A hand-edited
	/// file can contain these; a store would keep only one of each.
	pub fn duplicate_ids(&self) -> Vec<ReservationId> {
		let mut seen = BTreeSet::new();
		let mut duplicates = BTreeSet::new();
		for reservation in &self.reservations {
			if !seen.insert(reservation.id()) {
				duplicates.insert(reservation.id());
			}
		}
		duplicates.into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_room_from_str() {
		assert_eq!(Room::from_str("Ruang Edellweis").unwrap(), Room::Edellweis);
		assert_eq!(
			Room::from_str("ruang zoom cempaka").unwrap(),
			Room::ZoomCempaka
		);
		assert_eq!(Room::from_str(" melati ").unwrap(), Room::Melati);
		assert_eq!(
			Room::from_str("Ballroom"),
			Err(BookingError::UnknownRoom("Ballroom".to_string()))
		);
	}

	#[test]
	fn test_room_names_round_trip() {
		for room in Room::all() {
			assert_eq!(Room::from_str(room.name()).unwrap(), room);
			assert_eq!(Room::from_str(room.slug()).unwrap(), room);
		}
	}

	#[test]
	fn test_reservation_id_from_str() {
		assert_eq!("12".parse::<ReservationId>(), Ok(ReservationId::new(12)));
		assert_eq!("#7".parse::<ReservationId>(), Ok(ReservationId::new(7)));
		assert!("seven".parse::<ReservationId>().is_err());
		assert!("-1".parse::<ReservationId>().is_err());
	}

	#[test]
	fn test_reservation_json_shape() {
		let json = r#"{
			"id": 3,
			"title": "Standup",
			"room": "Ruang Edellweis",
			"date": "2024-06-01",
			"start_time": "09:00",
			"end_time": "09:30"
		}"#;

		let reservation: Reservation = serde_json::from_str(json).unwrap();
		assert_eq!(reservation.id(), ReservationId::new(3));
		assert_eq!(reservation.room(), Room::Edellweis);
		assert_eq!(reservation.interval().to_string(), "2024-06-01 09:00-09:30");

		let value = serde_json::to_value(&reservation).unwrap();
		assert_eq!(value["room"], "Ruang Edellweis");
		assert_eq!(value["start_time"], "09:00");
		assert_eq!(value["end_time"], "09:30");
	}

	#[test]
	fn test_stored_reservation_with_inverted_times_is_rejected() {
		let json = r#"{
			"id": 3,
			"title": "Backwards",
			"room": "Ruang Melati",
			"date": "2024-06-01",
			"start_time": "10:00",
			"end_time": "09:00"
		}"#;

		assert!(serde_json::from_str::<Reservation>(json).is_err());
	}

	#[test]
	fn test_snapshot_duplicate_ids() {
		let record = |id: u64, title: &str| -> Reservation {
			serde_json::from_value(serde_json::json!({
				"id": id,
				"title": title,
				"room": "Ruang Melati",
				"date": "2024-06-01",
				"start_time": "09:00",
				"end_time": "10:00",
			}))
			.unwrap()
		};

		let clean = Snapshot::new(vec![record(1, "A"), record(2, "B")]);
		assert!(clean.duplicate_ids().is_empty());

		let dirty = Snapshot::new(vec![
			record(3, "A"),
			record(1, "B"),
			record(3, "C"),
			record(1, "D"),
			record(3, "E"),
		]);
		assert_eq!(
			dirty.duplicate_ids(),
			vec![ReservationId::new(1), ReservationId::new(3)]
		);
	}

	#[test]
	fn test_snapshot_without_next_id() {
		let snapshot: Snapshot =
			serde_json::from_str(r#"{"reservations": []}"#).unwrap();
		assert_eq!(snapshot, Snapshot::default());
	}
}
