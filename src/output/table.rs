//
//  teax
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Table rendering on top of the `comfy_table` crate: UTF-8 box-drawing
//! borders, dynamic content arrangement to fit the terminal, and cyan
//! headers when the terminal supports color.
//!
//! ## Example
//!
//! ```rust,ignore
//! use teax::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(vec!["ID", "Name", "Status"])
//!     .row(vec!["1".into(), "runner-1".into(), "online".into()])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// A builder for terminal tables with a fluent API.
///
/// Color support is auto-detected from the terminal on creation; headers
/// are styled cyan when color is available.
pub struct TableBuilder {
    table: Table,
    headers: Vec<String>,
    color: bool,
}

impl TableBuilder {
    /// Creates a builder with UTF-8 borders and dynamic arrangement.
    pub fn new() -> Self {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        Self {
            table,
            headers: Vec::new(),
            color: console::colors_enabled(),
        }
    }

    /// Overrides color detection.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one data row.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .add_row(cells.into_iter().map(|c| Cell::new(c.into())));
        self
    }

    /// Renders the table to stdout.
    pub fn print(mut self) {
        if !self.headers.is_empty() {
            let header_cells: Vec<Cell> = self
                .headers
                .iter()
                .map(|h| {
                    let cell = Cell::new(h);
                    if self.color {
                        cell.fg(Color::Cyan)
                    } else {
                        cell
                    }
                })
                .collect();
            self.table.set_header(header_cells);
        }
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accepts_mixed_cell_sources() {
        // Smoke test: building must not panic regardless of input shape.
        TableBuilder::new()
            .color(false)
            .headers(vec!["a", "b"])
            .row(vec!["1".to_string(), "2".to_string()])
            .row(vec!["x", "y"])
            .print();
    }
}
