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
use crate::booking::reservation::{Reservation, Room};
use crate::reports::table::Table;
use crate::util::time::{DATE_FORMAT, TIME_FORMAT};

/// Renders booking listings for the terminal. Holds per-room listings that
/// were already sorted by the store.
pub struct ScheduleReporter {
	listings: Vec<(Room, Vec<Reservation>)>,
}

impl ScheduleReporter {
	pub fn new(listings: Vec<(Room, Vec<Reservation>)>) -> Self {
		Self { listings }
	}

	/// One section per room: a title line followed by its bookings, or a
	/// note that it has none.
	pub fn render(&self) -> String {
		let sections: Vec<String> = self
			.listings
			.iter()
			.map(|(room, reservations)| {
				let mut section = format!("{}\n", room);
				if reservations.is_empty() {
					section.push_str("No bookings\n");
				} else {
					section.push_str(&Self::booking_table(reservations));
				}
				section
			})
			.collect();

		sections.join("\n")
	}

	/// Counts per room, for the `rooms` command.
	pub fn render_summary(&self) -> String {
		let mut table = Table::new(3);
		table.right_align(vec![2]);
		table.add_header(vec!["Room", "Short", "Bookings"]);
		table.add_separator();

		for (room, reservations) in &self.listings {
			table.add_row(vec![
				room.name().to_string(),
				room.slug().to_string(),
				reservations.len().to_string(),
			]);
		}

		table.render()
	}

	fn booking_table(reservations: &[Reservation]) -> String {
		let mut table = Table::new(5);
		table.right_align(vec![0, 3]);
		table.add_header(vec!["Id", "Date", "Time", "Length", "Title"]);
		table.add_separator();

		for reservation in reservations {
			let interval = reservation.interval();
			table.add_row(vec![
				reservation.id().to_string(),
				interval.date().format(DATE_FORMAT).to_string(),
				format!(
					"{}-{}",
					interval.start().format(TIME_FORMAT),
					interval.end().format(TIME_FORMAT)
				),
				interval.span().to_string(),
				reservation.title().to_string(),
			]);
		}

		table.render()
	}
}

/// Lists overlapping pairs found by an integrity check.
pub fn render_conflicts(conflicts: &[(Reservation, Reservation)]) -> String {
	if conflicts.is_empty() {
		return "No overlapping bookings\n".to_string();
	}

	let mut out = String::new();
	for (a, b) in conflicts {
		out.push_str(&format!("{} overlaps with:\n  {}\n", a, b));
	}
	out
}
