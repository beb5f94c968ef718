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

/// Plain column-aligned table for listing bookings, one per line.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn render(&self) -> String {
		let mut max_widths = vec![0; self.column_count];

		for row in &self.rows {
			if let Row::Data(cells) | Row::Header(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					max_widths[i] = max_widths[i].max(value.chars().count());
				}
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			match row {
				Row::Header(cells) => {
					self.write_header(&mut out, &max_widths, cells)
				},
				Row::Data(cells) => {
					self.write_data(&mut out, &max_widths, cells)
				},
				Row::Separator => {
					let total_width = max_widths.iter().sum::<usize>()
						+ (3 * (self.column_count - 1));
					out.push_str(&"-".repeat(total_width));
				},
			}
			// no trailing padding on the last column
			let trimmed = out.trim_end_matches(' ').len();
			out.truncate(trimmed);
			out.push('\n');
		}

		out
	}

	fn write_data(
		&self,
		out: &mut String,
		max_widths: &[usize],
		cells: &[String],
	) {
		for (i, value) in cells.iter().enumerate() {
			let width = max_widths[i];
			if self.right_align[i] {
				out.push_str(&format!("{:>width$}", value, width = width));
			} else {
				out.push_str(&format!("{:<width$}", value, width = width));
			}
			if i < cells.len() - 1 {
				out.push_str("   ");
			}
		}
	}

	fn write_header(
		&self,
		out: &mut String,
		max_widths: &[usize],
		cells: &[String],
	) {
		for (i, value) in cells.iter().enumerate() {
			out.push_str(&Table::center_align(value, max_widths[i]));
			if i < cells.len() - 1 {
				out.push_str(" | ");
			}
		}
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}
