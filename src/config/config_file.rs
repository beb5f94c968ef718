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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub storage: Option<Storage>,
	pub prompt: Option<Prompt>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Storage {
	/// Location of the bookings file. Defaults to a file under the
	/// platform's data directory.
	pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Prompt {
	/// Ask before deleting a reservation (default true)
	pub confirm_delete: Option<bool>,
}

impl Config {
	pub fn data_path(&self) -> Option<&String> {
		self.storage.as_ref().and_then(|s| s.path.as_ref())
	}

	pub fn confirm_delete(&self) -> bool {
		self.prompt
			.as_ref()
			.and_then(|p| p.confirm_delete)
			.unwrap_or(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config() {
		let config: Config = toml::from_str("").unwrap();
		assert!(config.data_path().is_none());
		assert!(config.confirm_delete());
	}

	#[test]
	fn test_full_config() {
		let config: Config = toml::from_str(
			r#"
			[storage]
			path = "/srv/rooms/bookings.json"

			[prompt]
			confirm_delete = false
			"#,
		)
		.unwrap();

		assert_eq!(
			config.data_path().map(String::as_str),
			Some("/srv/rooms/bookings.json")
		);
		assert!(!config.confirm_delete());
	}
}
