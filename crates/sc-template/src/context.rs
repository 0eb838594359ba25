//! Values substituted into test templates

use chrono::{DateTime, Local};
use sc_core::sql_utils::{escape_bracket_ident, escape_sql_string};
use std::collections::BTreeMap;

/// Placeholder names understood by the built-in templates
pub mod tokens {
    pub const TESTCLASS: &str = "TESTCLASS";
    pub const TESTNAME: &str = "TESTNAME";
    pub const SCHEMA: &str = "SCHEMA";
    pub const NAME: &str = "NAME";
    pub const OBJECTTYPE: &str = "OBJECTTYPE";
    pub const CREATOR: &str = "CREATOR";
    pub const DATE: &str = "DATE";
    pub const DATABASE: &str = "DATABASE";
    pub const COLLATION: &str = "COLLATION";
    pub const INDEX: &str = "INDEX";
    pub const COLUMNS: &str = "COLUMNS";
    pub const PARAMETERS: &str = "PARAMETERS";
    pub const INDEXES: &str = "INDEXES";
    pub const CONSTRAINTS: &str = "CONSTRAINTS";
    pub const FOREIGNKEYS: &str = "FOREIGNKEYS";
}

/// Timestamp format written into the generated test headers
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run-wide values shared by every rendered test.
///
/// Captured once when a run starts so all files of the run carry the same
/// creator and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub creator: String,
    pub date: String,
}

impl RenderContext {
    /// Context stamped with the current local time
    pub fn new(creator: &str) -> Self {
        Self::at(creator, Local::now())
    }

    /// Context stamped with a given time
    pub fn at(creator: &str, when: DateTime<Local>) -> Self {
        Self::fixed(creator, &when.format(DATE_FORMAT).to_string())
    }

    /// Context with a preformatted date
    pub fn fixed(creator: &str, date: &str) -> Self {
        Self {
            creator: creator.to_string(),
            date: date.to_string(),
        }
    }

    /// Placeholder values seeded with the creator and date
    pub fn placeholders(&self) -> PlaceholderValues {
        PlaceholderValues::new()
            .literal(tokens::CREATOR, &self.creator)
            .literal(tokens::DATE, &self.date)
    }
}

/// Token values for one render.
///
/// Literal values end up inside SQL string literals and have their single
/// quotes doubled. Identifier values end up inside `[...]` and have `]`
/// doubled. Raw values are structural (data blocks) and are inserted
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderValues {
    values: BTreeMap<String, String>,
}

impl PlaceholderValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value that is substituted inside SQL string literals
    pub fn literal(mut self, token: &str, value: &str) -> Self {
        self.values
            .insert(token.to_string(), escape_sql_string(value));
        self
    }

    /// Add a value that is substituted inside a bracketed identifier
    pub fn identifier(mut self, token: &str, value: &str) -> Self {
        self.values
            .insert(token.to_string(), escape_bracket_ident(value));
        self
    }

    /// Add a value that is substituted unchanged
    pub fn raw(mut self, token: &str, value: impl Into<String>) -> Self {
        self.values.insert(token.to_string(), value.into());
        self
    }

    /// Value that will be substituted for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}
