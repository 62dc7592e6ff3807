//
//  teax
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! This module provides the output formatting for the CLI, supporting
//! three modes to accommodate different consumers:
//!
//! - **Table format**: Human-readable tables for interactive terminal use
//! - **Simple format**: Minimal whitespace-separated values for scripting
//! - **CSV format**: Spreadsheet-importable output with injection-safe
//!   field escaping
//!
//! ## Architecture
//!
//! Every listable resource defines a small display struct implementing
//! [`RowOutput`]: canonical header and cell values, plus the condensed
//! `simple` line. [`OutputWriter`] renders those rows in whichever format
//! the user selected; commands never branch on the format themselves.
//!
//! ## Example
//!
//! ```rust
//! use teax::output::{OutputFormat, OutputWriter, RowOutput};
//!
//! struct Row { name: String, id: i64 }
//!
//! impl RowOutput for Row {
//!     fn headers() -> Vec<&'static str> { vec!["name", "id"] }
//!     fn row(&self) -> Vec<String> { vec![self.name.clone(), self.id.to_string()] }
//!     fn simple(&self) -> String { format!("{} {}", self.id, self.name) }
//! }
//!
//! let writer = OutputWriter::new(OutputFormat::Csv);
//! writer.write_list(&[Row { name: "bug".into(), id: 1 }], "no labels");
//! ```

mod csv;
mod table;

pub use csv::csv_safe;
pub use table::TableBuilder;

use clap::ValueEnum;

/// The available output formats.
///
/// # Variants
///
/// * `Table` - Human-readable tables (default)
/// * `Simple` - Minimal values for scripting, one record per line
/// * `Csv` - Comma-separated values with a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table with headers.
    #[default]
    Table,
    /// Minimal whitespace-separated values for scripting.
    Simple,
    /// Comma-separated values with a header row.
    Csv,
}

/// A type renderable as one record in any output format.
///
/// `headers()` and `row()` must agree on column order; `simple()` is the
/// condensed form scripts consume (typically the id or the few fields a
/// pipe would want).
pub trait RowOutput {
    /// Column headers, in order.
    fn headers() -> Vec<&'static str>
    where
        Self: Sized;

    /// Cell values for this record, in header order.
    fn row(&self) -> Vec<String>;

    /// Condensed single-line form for scripting.
    fn simple(&self) -> String;
}

/// Renders records and status lines in the selected output format.
///
/// Mutation confirmations and empty-list notices go to stdout only in
/// table mode; machine formats stay clean for piping.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Creates a writer for the given format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The format this writer renders.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes a list of records.
    ///
    /// In table mode an empty list prints `empty_message` instead of an
    /// empty table; machine formats print nothing (CSV still emits its
    /// header row).
    pub fn write_list<T: RowOutput>(&self, items: &[T], empty_message: &str) {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{empty_message}");
                    return;
                }
                let mut builder = TableBuilder::new().headers(T::headers());
                for item in items {
                    builder = builder.row(item.row());
                }
                builder.print();
            }
            OutputFormat::Simple => {
                for item in items {
                    println!("{}", item.simple());
                }
            }
            OutputFormat::Csv => {
                println!(
                    "{}",
                    T::headers()
                        .iter()
                        .map(|h| csv_safe(h))
                        .collect::<Vec<_>>()
                        .join(",")
                );
                for item in items {
                    println!(
                        "{}",
                        item.row()
                            .iter()
                            .map(|f| csv_safe(f))
                            .collect::<Vec<_>>()
                            .join(",")
                    );
                }
            }
        }
    }

    /// Writes a single record as a one-row list.
    pub fn write_one<T: RowOutput>(&self, item: &T) {
        match self.format {
            OutputFormat::Simple => println!("{}", item.simple()),
            _ => self.write_list(std::slice::from_ref(item), ""),
        }
    }

    /// Confirms a mutation (`deleted runner 42`).
    ///
    /// Table mode gets a styled confirmation; simple mode echoes
    /// `action subject`; CSV prints a two-field record.
    pub fn write_mutation(&self, action: &str, subject: &str) {
        match self.format {
            OutputFormat::Table => {
                println!(
                    "{} {action}: {subject}",
                    console::style("\u{2713}").green().bold()
                );
            }
            OutputFormat::Simple => println!("{action} {subject}"),
            OutputFormat::Csv => {
                println!("action,subject");
                println!("{},{}", csv_safe(action), csv_safe(subject));
            }
        }
    }

    /// Writes one bare value (a token, an id) in every format.
    pub fn write_value(&self, label: &str, value: &str) {
        match self.format {
            OutputFormat::Table => println!("{}: {value}", console::style(label).bold()),
            OutputFormat::Simple => println!("{value}"),
            OutputFormat::Csv => {
                println!("{}", csv_safe(label));
                println!("{}", csv_safe(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row;

    impl RowOutput for Row {
        fn headers() -> Vec<&'static str> {
            vec!["a", "b"]
        }
        fn row(&self) -> Vec<String> {
            vec!["1".to_string(), "=SUM(A1)".to_string()]
        }
        fn simple(&self) -> String {
            "1".to_string()
        }
    }

    #[test]
    fn test_headers_and_rows_agree() {
        let row = Row;
        assert_eq!(Row::headers().len(), row.row().len());
    }

    #[test]
    fn test_writer_reports_format() {
        assert_eq!(OutputWriter::new(OutputFormat::Csv).format(), OutputFormat::Csv);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
