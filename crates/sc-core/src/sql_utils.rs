//! SQL literal rendering utilities
//!
//! Catalog values end up inside generated T-SQL scripts as literal tuples
//! (`('Id', 'int', 4, 10, 0)`). Every string is quoted and has embedded
//! single quotes doubled, so object names like `O'Brien` cannot break the
//! generated script.

use std::fmt;

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Escape a value for use inside a `[bracketed]` identifier by doubling `]`.
pub fn escape_bracket_ident(value: &str) -> String {
    value.replace(']', "]]")
}

/// Quote a value as a SQL string literal.
///
/// # Examples
/// ```
/// use sc_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("int"), "'int'");
/// assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

/// A single value inside a literal tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Str(s) => f.write_str(&quote_literal(s)),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Str(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Str(value.clone())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

/// Render values as a parenthesized, comma-separated literal tuple.
///
/// # Examples
/// ```
/// use sc_core::sql_utils::{literal_tuple, SqlValue};
/// let tuple = literal_tuple(&[SqlValue::from("Id"), SqlValue::from(4)]);
/// assert_eq!(tuple, "('Id', 4)");
/// ```
pub fn literal_tuple(values: &[SqlValue]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

/// Join literal tuples into a data block: one tab-indented tuple per line,
/// separated by `,\n`, terminated by `;`.
///
/// Returns an empty string when there are no tuples.
pub fn data_block<I, S>(tuples: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = tuples
        .into_iter()
        .map(|t| format!("\t{}", t.as_ref()))
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    format!("{};", lines.join(",\n"))
}
