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
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// A bookings file path unique to the calling test, with no file behind it
/// yet.
fn data_file(name: &str) -> PathBuf {
	let dir = std::env::temp_dir()
		.join(format!("roombook-it-{}-{}", std::process::id(), name));
	let _ = fs::remove_dir_all(&dir);
	fs::create_dir_all(&dir).expect("Failed to create scratch directory");
	dir.join("bookings.json")
}

fn execute(file: &PathBuf, cmd: &str, args: Vec<&str>) -> Output {
	let loc = file.to_str().expect("non-UTF-8 temp path");
	let all_args = [vec!["run", "--quiet", "--", "-f", loc, cmd], args].concat();

	Command::new("cargo")
		.args(all_args)
		.output()
		.expect("Failed to execute process")
}

fn succeed(file: &PathBuf, cmd: &str, args: Vec<&str>) -> String {
	let output = execute(file, cmd, args);
	assert!(
		output.status.success(),
		"{} failed: {}",
		cmd,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8_lossy(&output.stdout).to_string()
}

fn fail(file: &PathBuf, cmd: &str, args: Vec<&str>) -> String {
	let output = execute(file, cmd, args);
	assert!(!output.status.success(), "{} unexpectedly succeeded!", cmd);
	String::from_utf8_lossy(&output.stderr).to_string()
}

fn add(
	file: &PathBuf,
	title: &str,
	room: &str,
	date: &str,
	start: &str,
	end: &str,
) -> Output {
	execute(
		file,
		"add",
		vec!["-t", title, "-r", room, "-d", date, "-s", start, "-e", end],
	)
}

#[test]
fn test_integration_booking_lifecycle() {
	let file = data_file("lifecycle");

	let standup = add(
		&file,
		"Standup",
		"Ruang Edellweis",
		"2024-06-01",
		"09:00",
		"09:30",
	);
	assert!(standup.status.success());
	assert_eq!(
		String::from_utf8_lossy(&standup.stdout).trim(),
		"Booked #1 2024-06-01 09:00-09:30 | Ruang Edellweis | Standup"
	);

	let listing = succeed(&file, "ls", vec!["-r", "Ruang Edellweis"]);
	assert!(listing.contains("Standup"));
	assert_eq!(listing.matches("2024-06-01").count(), 1);

	// overlaps the standup in the same room
	let sync =
		add(&file, "Sync", "Ruang Edellweis", "2024-06-01", "09:15", "09:45");
	assert!(!sync.status.success());
	let stderr = String::from_utf8_lossy(&sync.stderr);
	assert!(stderr.contains("Standup"), "unexpected error: {}", stderr);

	let listing = succeed(&file, "ls", vec!["-r", "edellweis"]);
	assert!(!listing.contains("Sync"));

	// same slot, different room
	let review = add(
		&file,
		"Review",
		"Ruang Zoom Cempaka",
		"2024-06-01",
		"09:15",
		"09:45",
	);
	assert!(review.status.success());

	let listing = succeed(&file, "ls", vec!["-r", "cempaka"]);
	assert!(listing.contains("Review"));
	assert!(!listing.contains("Standup"));

	let rooms = succeed(&file, "rooms", vec![]);
	assert!(rooms.contains("Ruang Edellweis"));
	assert!(rooms.contains("Ruang Melati"));

	let check = succeed(&file, "check", vec![]);
	assert_eq!(check.trim(), "No overlapping bookings");
}

#[test]
fn test_integration_listing_is_chronological() {
	let file = data_file("ordering");

	assert!(add(&file, "Late", "melati", "2024-06-01", "15:00", "16:00")
		.status
		.success());
	assert!(add(&file, "Early", "melati", "2024-06-01", "08:00", "09:00")
		.status
		.success());
	assert!(add(&file, "Edge", "melati", "2024-06-01", "09:00", "10:00")
		.status
		.success());

	let listing = succeed(&file, "ls", vec!["-r", "melati", "-d", "2024-06-01"]);
	let early = listing.find("Early").unwrap();
	let edge = listing.find("Edge").unwrap();
	let late = listing.find("Late").unwrap();
	assert!(early < edge && edge < late, "out of order:\n{}", listing);
}

#[test]
fn test_integration_remove() {
	let file = data_file("remove");

	assert!(add(&file, "Standup", "anggrek", "2024-06-01", "09:00", "09:30")
		.status
		.success());

	let out = succeed(&file, "rm", vec!["1", "-y"]);
	assert!(out.starts_with("Deleted #1"));

	let err = fail(&file, "rm", vec!["1", "-y"]);
	assert!(err.contains("no reservation with id 1"), "got: {}", err);

	// ids are not reused after the newest one is deleted
	let again =
		add(&file, "Standup", "anggrek", "2024-06-01", "09:00", "09:30");
	assert!(String::from_utf8_lossy(&again.stdout).starts_with("Booked #2"));
}

#[test]
fn test_integration_rejects_malformed_range() {
	let file = data_file("range");

	let out = add(&file, "Backwards", "melati", "2024-06-01", "10:00", "09:00");
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr)
		.contains("must be after start time"));

	let out = execute(&file, "add", vec!["-r", "melati", "-d", "2024-06-01"]);
	assert!(!out.status.success());
	assert!(String::from_utf8_lossy(&out.stderr)
		.contains("missing required field(s): title, start time, end time"));

	assert!(!file.exists(), "rejected bookings must not be saved");
}

#[test]
fn test_integration_check_finds_historic_overlaps() {
	let file = data_file("check");
	fs::write(
		&file,
		r#"{
  "next_id": 3,
  "reservations": [
    {"id": 1, "title": "Standup", "room": "Ruang Edellweis",
     "date": "2024-06-01", "start_time": "09:00", "end_time": "09:30"},
    {"id": 2, "title": "Sync", "room": "Ruang Edellweis",
     "date": "2024-06-01", "start_time": "09:15", "end_time": "09:45"}
  ]
}"#,
	)
	.unwrap();

	let output = execute(&file, "check", vec![]);
	assert!(!output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("#1 2024-06-01 09:00-09:30"));
	assert!(stdout.contains("#2 2024-06-01 09:15-09:45"));
}

#[test]
fn test_integration_corrupt_file_is_set_aside() {
	let file = data_file("corrupt");
	fs::write(&file, "not json at all").unwrap();

	let listing = succeed(&file, "ls", vec!["-r", "melati"]);
	assert!(listing.contains("No bookings"));

	let mut backup = file.clone().into_os_string();
	backup.push(".corrupt");
	assert_eq!(fs::read_to_string(backup).unwrap(), "not json at all");
}

#[test]
fn test_integration_stray_room_argument_is_rejected() {
	let file = data_file("stray");

	let err = fail(&file, "ls", vec!["melati"]);
	assert!(err.contains("Unexpected argument 'melati'"), "got: {}", err);
}
