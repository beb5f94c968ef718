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
use crate::booking::error::{BookingError, ConflictInfo};
use crate::booking::interval::TimeInterval;
use crate::booking::reservation::{
	NewReservation, Reservation, ReservationId, Room, Snapshot,
};
use crate::util::time::{parse_date, parse_time};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Sole owner of the reservation collection, and the only place where
/// reservations are created or destroyed. It enforces that no two
/// reservations in the same room overlap.
///
/// The store is purely in-memory and synchronous. It neither logs nor talks
/// to storage; the caller loads a Snapshot to build it and is expected to
/// save a fresh one after every successful `add` or `remove`. Admission is a
/// check followed by an insert, so callers sharing a store between threads
/// must hold a lock across the whole `add` call.
#[derive(Debug)]
pub struct BookingStore {
	/// Ids are allocated in increasing order, so this iterates in insertion
	/// order too.
	reservations: BTreeMap<ReservationId, Reservation>,
	/// The id that will be assigned to the next admitted reservation.
	/// `u64::MAX` is never handed out; reaching it means ids are used up.
	next_id: u64,
}

impl BookingStore {
	pub fn new() -> Self {
		Self {
			reservations: BTreeMap::new(),
			next_id: 1,
		}
	}

	/// Restores a previously saved collection as-is. Historic data is
	/// trusted, so overlaps are not rejected here; see `find_conflicts`.
	/// Ids must be unique (see `Snapshot::duplicate_ids`); a later record
	/// replaces an earlier one with the same id.
	pub fn initialize(snapshot: Snapshot) -> Self {
		let mut store = BookingStore::new();

		for reservation in snapshot.reservations {
			store.next_id = store
				.next_id
				.max(reservation.id().value().saturating_add(1));
			store.reservations.insert(reservation.id(), reservation);
		}
		store.next_id = store.next_id.max(snapshot.next_id);

		store
	}

	// ---------------
	// -- MUTATIONS --
	// ---------------

	/// Validates the candidate and, if it clashes with nothing else in its
	/// room, admits it under a fresh id. On any failure the store is left
	/// untouched.
	pub fn add(
		&mut self,
		candidate: NewReservation,
	) -> Result<Reservation, BookingError> {
		let (title, room, interval) = Self::validate(&candidate)?;

		let conflicts: Vec<ConflictInfo> = self
			.reservations
			.values()
			.filter(|r| r.room() == room && r.interval().overlaps(&interval))
			.map(|r| ConflictInfo {
				id: r.id(),
				title: r.title().to_string(),
				interval: *r.interval(),
			})
			.collect();

		if !conflicts.is_empty() {
			return Err(BookingError::RoomConflict(conflicts));
		}

		if self.next_id == u64::MAX {
			return Err(BookingError::IdsExhausted);
		}
		let id = ReservationId::new(self.next_id);
		self.next_id += 1;

		let reservation = Reservation::new(id, title, room, interval);
		self.reservations.insert(id, reservation.clone());

		Ok(reservation)
	}

	/// Deletes a reservation. Getting the user's go-ahead is the caller's
	/// job.
	pub fn remove(&mut self, id: ReservationId) -> Result<(), BookingError> {
		self.reservations
			.remove(&id)
			.map(|_| ())
			.ok_or(BookingError::NotFound(id))
	}

	/// Checks a candidate field by field, in the order a user would want to
	/// hear about problems.
	fn validate(
		candidate: &NewReservation,
	) -> Result<(String, Room, TimeInterval), BookingError> {
		let fields = [
			("title", &candidate.title),
			("room", &candidate.room),
			("date", &candidate.date),
			("start time", &candidate.start_time),
			("end time", &candidate.end_time),
		];

		let missing: Vec<&'static str> = fields
			.iter()
			.filter(|(_, value)| value.trim().is_empty())
			.map(|(name, _)| *name)
			.collect();
		if !missing.is_empty() {
			return Err(BookingError::IncompleteFields(missing));
		}

		let room = Room::from_str(&candidate.room)?;

		let date = parse_date(&candidate.date).ok_or_else(|| {
			BookingError::Malformed {
				field: "date",
				value: candidate.date.clone(),
			}
		})?;
		let start = parse_time(&candidate.start_time).ok_or_else(|| {
			BookingError::Malformed {
				field: "start time",
				value: candidate.start_time.clone(),
			}
		})?;
		let end = parse_time(&candidate.end_time).ok_or_else(|| {
			BookingError::Malformed {
				field: "end time",
				value: candidate.end_time.clone(),
			}
		})?;

		let interval = TimeInterval::new(date, start, end)?;

		Ok((candidate.title.trim().to_string(), room, interval))
	}

	// -------------
	// -- QUERIES --
	// -------------

	pub fn get(&self, id: ReservationId) -> Option<&Reservation> {
		self.reservations.get(&id)
	}

	pub fn len(&self) -> usize {
		self.reservations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.reservations.is_empty()
	}

	/// All reservations in id order
	pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
		self.reservations.values()
	}

	/// The bookings of one room, earliest first. Computed fresh on every
	/// call.
	pub fn list_by_room(&self, room: Room) -> Vec<Reservation> {
		let mut listing: Vec<Reservation> =
			self.iter().filter(|r| r.room() == room).cloned().collect();

		// stable, so identical intervals keep id order
		listing.sort_by_key(|r| *r.interval());
		listing
	}

	/// Every booking on the given day across all rooms, grouped by room and
	/// then ordered by time.
	pub fn list_by_date(&self, date: NaiveDate) -> Vec<Reservation> {
		let mut listing: Vec<Reservation> = self
			.iter()
			.filter(|r| r.interval().date() == date)
			.cloned()
			.collect();

		listing.sort_by_key(|r| (r.room(), *r.interval()));
		listing
	}

	/// Pairs of reservations in the same room whose intervals overlap. Only
	/// data loaded through `initialize` can produce any, since `add` refuses
	/// them.
	pub fn find_conflicts(&self) -> Vec<(Reservation, Reservation)> {
		let mut conflicts = vec![];

		for room in Room::all() {
			let listing = self.list_by_room(room);
			for (i, a) in listing.iter().enumerate() {
				// sorted by start, so stop once b starts after a has ended
				for b in listing[i + 1..].iter() {
					if b.interval().date() != a.interval().date()
						|| b.interval().start() >= a.interval().end()
					{
						break;
					}
					conflicts.push((a.clone(), b.clone()));
				}
			}
		}

		conflicts
	}

	/// Everything needed to rebuild this store later
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			next_id: self.next_id,
			reservations: self.reservations.values().cloned().collect(),
		}
	}
}

impl Default for BookingStore {
	fn default() -> Self {
		Self::new()
	}
}
