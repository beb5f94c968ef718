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
use crate::booking::reservation::{Reservation, Snapshot};
use crate::config::config_file::Config;
use anyhow::{anyhow, Error};
use dirs::{data_dir, home_dir};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Reads and writes the bookings file. Nothing in here ever fails loudly:
/// a broken file loads as an empty collection and a failed write is logged,
/// so that storage trouble never surfaces as a booking error.
pub struct Filesystem {
	data_path: PathBuf,
}

/// Accepted layouts of the bookings file. Older files are a bare list with
/// no id high-water mark.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFile {
	Full(Snapshot),
	Bare(Vec<Reservation>),
}

impl Filesystem {
	pub fn new(data_path: PathBuf) -> Self {
		Self { data_path }
	}

	/// Picks the bookings file: an explicit path wins, then the config,
	/// then the platform default.
	pub fn locate(
		explicit: Option<&String>,
		config: Option<&Config>,
	) -> Result<Self, Error> {
		let path = match explicit.or(config.and_then(|c| c.data_path())) {
			Some(p) => PathBuf::from(p),
			None => data_dir()
				.ok_or_else(|| anyhow!("unable to determine data directory"))?
				.join("roombook/bookings.json"),
		};

		Ok(Self::new(path))
	}

	pub fn data_path(&self) -> &Path {
		&self.data_path
	}

	/// Fetches the config from the given path, or default path if none.
	pub fn get_config(
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => home_dir()
				.ok_or_else(|| anyhow!("unable to determine home directory"))?
				.join(".config/roombook/config.toml"),
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
			info!("created empty config at {}", config_path.display());
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}

	/// Reads the full set of saved reservations. A missing file is a first
	/// run. An unreadable or unparseable one, or one that gives two records
	/// the same id, is copied aside to
	/// `<file>.corrupt` before starting over empty, so the next save cannot
	/// destroy it.
	pub fn load(&self) -> Snapshot {
		let content = match fs::read_to_string(&self.data_path) {
			Ok(content) => content,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(
					"no bookings file at {}, starting empty",
					self.data_path.display()
				);
				return Snapshot::default();
			},
			Err(e) => {
				warn!(
					"unable to read bookings file {}: {}",
					self.data_path.display(),
					e
				);
				self.quarantine();
				return Snapshot::default();
			},
		};

		if content.trim().is_empty() {
			return Snapshot::default();
		}

		let snapshot = match serde_json::from_str::<StoredFile>(&content) {
			Ok(StoredFile::Full(snapshot)) => snapshot,
			Ok(StoredFile::Bare(reservations)) => {
				debug!("{} has no id high-water mark", self.data_path.display());
				Snapshot::new(reservations)
			},
			Err(e) => {
				warn!(
					"bookings file {} is not valid: {}",
					self.data_path.display(),
					e
				);
				self.quarantine();
				return Snapshot::default();
			},
		};

		// a store keeps one record per id, so the rest would be lost on the
		// next save
		let duplicates = snapshot.duplicate_ids();
		if !duplicates.is_empty() {
			let ids: Vec<String> =
				duplicates.iter().map(|id| id.to_string()).collect();
			warn!(
				"bookings file {} reuses id(s) {}",
				self.data_path.display(),
				ids.join(", ")
			);
			self.quarantine();
			return Snapshot::default();
		}

		debug!(
			"loaded {} reservation(s) from {}",
			snapshot.reservations.len(),
			self.data_path.display()
		);
		snapshot
	}

	/// Writes the snapshot through a temporary file so a crash mid-write
	/// leaves the previous file intact. Returns whether the write landed.
	pub fn save(&self, snapshot: &Snapshot) -> bool {
		match self.try_save(snapshot) {
			Ok(()) => {
				debug!(
					"saved {} reservation(s) to {}",
					snapshot.reservations.len(),
					self.data_path.display()
				);
				true
			},
			Err(e) => {
				error!(
					"failed to save bookings to {}: {}",
					self.data_path.display(),
					e
				);
				false
			},
		}
	}

	fn try_save(&self, snapshot: &Snapshot) -> Result<(), Error> {
		if let Some(parent) = self.data_path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}

		let json = serde_json::to_string_pretty(snapshot)?;
		let tmp = self.sibling(".tmp");
		fs::write(&tmp, json + "\n")?;
		fs::rename(&tmp, &self.data_path)?;

		Ok(())
	}

	fn quarantine(&self) {
		let backup = self.sibling(".corrupt");
		match fs::copy(&self.data_path, &backup) {
			Ok(_) => warn!("kept a copy of the old file at {}", backup.display()),
			Err(e) => error!(
				"unable to back up {} to {}: {}",
				self.data_path.display(),
				backup.display(),
				e
			),
		}
	}

	fn sibling(&self, suffix: &str) -> PathBuf {
		let mut name: OsString = self.data_path.clone().into_os_string();
		name.push(suffix);
		PathBuf::from(name)
	}
}
