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
use crate::booking::reservation::{
	NewReservation, Reservation, ReservationId, Room,
};
use crate::booking::store::BookingStore;
use crate::reports::schedule_reporter::{render_conflicts, ScheduleReporter};
use crate::storage::filesystem::Filesystem;
use crate::util::time::{parse_date, today};
use anyhow::{anyhow, bail, Error};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use std::io;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, info, Level};

mod booking;
mod config;
mod reports;
mod storage;
mod util;

#[derive(Parser)]
#[command(
	name = "roombook",
	version = "0.1",
	about = "Meeting room booking tool that refuses double bookings"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The reservation id for the Rm command
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Bookings file (default: storage.path from config, else the user
	/// data directory)
	#[arg(short)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/roombook/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// What the room is booked for
	#[arg(short, long)]
	title: Option<String>,

	/// Room name or short name, e.g. "Ruang Melati" or "melati"
	#[arg(short, long)]
	room: Option<String>,

	/// Day of the booking (YYYY-MM-DD, or "today" when listing)
	#[arg(short, long)]
	date: Option<String>,

	/// Start time (HH:MM)
	#[arg(short, long)]
	start: Option<String>,

	/// End time (HH:MM), must be after the start time
	#[arg(short, long)]
	end: Option<String>,

	/// Delete without asking for confirmation
	#[arg(short, long)]
	yes: bool,

	/// Log more detail to stderr; repeat for debug output
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(term) = &self.term {
			if self.command != Directive::Rm {
				bail!(
					"Unexpected argument '{}' (use -r to pick a room, -d a date)",
					term
				);
			}
		}

		Ok(())
	}

	/// The config file is only needed to find the bookings file or to decide
	/// whether to prompt, so don't touch it otherwise.
	fn needs_config(&self) -> bool {
		self.config.is_some()
			|| self.file.is_none()
			|| (self.command == Directive::Rm && !self.yes)
	}
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
enum Directive {
	Add, // book a room
	Rm,  // delete a booking by id
	Ls,  // list bookings per room

	Rooms, // list the rooms that can be booked

	Check, // find overlapping bookings in the stored data
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_logging(args.verbose);

	let config = if args.needs_config() {
		Some(Filesystem::get_config(args.config.as_ref())?)
	} else {
		None
	};

	let fs = Filesystem::locate(args.file.as_ref(), config.as_ref())?;
	let mut store = BookingStore::initialize(fs.load());
	debug!(
		"{} reservation(s) in {}",
		store.len(),
		fs.data_path().display()
	);

	match args.command {
		Directive::Add => {
			let candidate = NewReservation {
				title: args.title.unwrap_or_default(),
				room: args.room.unwrap_or_default(),
				date: args.date.unwrap_or_default(),
				start_time: args.start.unwrap_or_default(),
				end_time: args.end.unwrap_or_default(),
			};

			let reservation = store
				.add(candidate)
				.map_err(|e| anyhow!("booking rejected: {}", e))?;
			info!("admitted reservation #{}", reservation.id());

			persist(&fs, &store)?;
			println!("Booked {}", reservation);
		},
		Directive::Rm => {
			let Some(term) = &args.term else {
				bail!("No reservation id specified");
			};
			let id = ReservationId::from_str(term)?;
			let reservation = store
				.get(id)
				.cloned()
				.ok_or(BookingError::NotFound(id))?;

			let ask = !args.yes
				&& config.as_ref().map_or(true, |c| c.confirm_delete());
			if ask && !confirm(&format!("Delete {}?", reservation))? {
				println!("Kept #{}", id);
				return Ok(());
			}

			store.remove(id)?;
			info!("removed reservation #{}", id);

			persist(&fs, &store)?;
			println!("Deleted {}", reservation);
		},
		Directive::Ls => {
			let rooms = match &args.room {
				Some(room) => vec![Room::from_str(room)?],
				None => Room::all().to_vec(),
			};
			let date = args.date.as_deref().map(parse_day).transpose()?;

			let listings = rooms
				.into_iter()
				.map(|room| {
					let reservations: Vec<Reservation> = match date {
						Some(d) => store
							.list_by_date(d)
							.into_iter()
							.filter(|r| r.room() == room)
							.collect(),
						None => store.list_by_room(room),
					};
					(room, reservations)
				})
				.collect();

			print!("{}", ScheduleReporter::new(listings).render());
		},
		Directive::Rooms => {
			let listings = Room::all()
				.into_iter()
				.map(|room| (room, store.list_by_room(room)))
				.collect();

			print!("{}", ScheduleReporter::new(listings).render_summary());
		},
		Directive::Check => {
			if store.is_empty() {
				println!("No bookings");
				return Ok(());
			}

			let conflicts = store.find_conflicts();
			print!("{}", render_conflicts(&conflicts));
			if !conflicts.is_empty() {
				bail!("{} overlapping pair(s) found", conflicts.len());
			}
		},
	}

	Ok(())
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => Level::WARN,
		1 => Level::INFO,
		_ => Level::DEBUG,
	};

	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.with_writer(io::stderr)
		.init();
}

/// Writes the store back after a change. The storage layer has already
/// logged the cause if this fails.
fn persist(fs: &Filesystem, store: &BookingStore) -> Result<(), Error> {
	if !fs.save(&store.snapshot()) {
		bail!(
			"change could not be saved to {}",
			fs.data_path().display()
		);
	}
	Ok(())
}

fn parse_day(s: &str) -> Result<NaiveDate, Error> {
	if s.eq_ignore_ascii_case("today") {
		return Ok(today());
	}
	parse_date(s).ok_or_else(|| anyhow!("Date format must be YYYY-MM-DD"))
}

/// Asks a yes/no question on stdin. Anything but an explicit yes, including
/// end of input, is a no.
fn confirm(question: &str) -> Result<bool, Error> {
	print!("{} [y/N] ", question);
	io::stdout().flush()?;

	let mut answer = String::new();
	io::stdin().lock().read_line(&mut answer)?;

	Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
