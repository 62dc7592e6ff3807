//
//  teax
//  output/csv.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # CSV Field Escaping
//!
//! CSV output frequently lands in a spreadsheet, and spreadsheets execute
//! cells that start with formula characters. [`csv_safe`] therefore does
//! two jobs: standard CSV quoting, and neutralizing formula injection by
//! prefixing a leading `=`, `+`, `-` or `@` with a single quote.

/// Escapes one field for CSV output.
///
/// Fields containing commas, quotes or newlines are quoted with doubled
/// inner quotes. Fields starting with a spreadsheet formula character
/// (`=`, `+`, `-`, `@`), even after leading whitespace, are prefixed with
/// `'` so the receiving spreadsheet treats them as text.
///
/// # Example
///
/// ```rust
/// use teax::output::csv_safe;
///
/// assert_eq!(csv_safe("plain"), "plain");
/// assert_eq!(csv_safe("a,b"), "\"a,b\"");
/// assert_eq!(csv_safe("say \"hi\""), "\"say \"\"hi\"\"\"");
/// assert_eq!(csv_safe("=SUM(A1:A9)"), "'=SUM(A1:A9)");
/// ```
pub fn csv_safe(field: &str) -> String {
    let mut value = field.to_string();

    // Neutralize formula injection before quoting.
    let starts_with_formula = value
        .trim_start()
        .starts_with(['=', '+', '-', '@']);
    if starts_with_formula {
        value = format!("'{value}");
    }

    if value.contains([',', '"', '\n', '\r']) {
        value = format!("\"{}\"", value.replace('"', "\"\""));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_untouched() {
        assert_eq!(csv_safe("plain"), "plain");
        assert_eq!(csv_safe("two words"), "two words");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(csv_safe("a,b"), "\"a,b\"");
        assert_eq!(csv_safe("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_safe("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_formula_injection_neutralized() {
        assert_eq!(csv_safe("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_safe("+1234"), "'+1234");
        assert_eq!(csv_safe("-rm -rf"), "'-rm -rf");
        assert_eq!(csv_safe("@import"), "'@import");
        // Leading whitespace does not defeat the guard.
        assert_eq!(csv_safe("  =cmd"), "'  =cmd");
    }

    #[test]
    fn test_formula_plus_comma_gets_both_treatments() {
        assert_eq!(csv_safe("=a,b"), "\"'=a,b\"");
    }
}
