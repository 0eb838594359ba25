//! Error types for sc-gen

use sc_core::{CoreError, ObjectKind};
use sc_db::DbError;
use sc_template::TemplateError;
use thiserror::Error;

/// Test generation errors
#[derive(Error, Debug)]
pub enum GenError {
    /// Run cannot start with the given settings (G001)
    #[error("[G001] Configuration error: {message}")]
    Configuration { message: String },

    /// Catalog unreachable (G002)
    #[error("[G002] Catalog connection failed: {source}")]
    Connection {
        #[source]
        source: DbError,
    },

    /// Metadata query failed for one object (G003)
    #[error("[G003] Fetching {category} metadata for {object} failed: {source}")]
    MetadataFetch {
        object: String,
        category: String,
        #[source]
        source: DbError,
    },

    /// Listing the objects of a kind failed (G004)
    #[error("[G004] Listing {} objects failed: {source}", .kind.phrase())]
    Enumeration {
        kind: ObjectKind,
        #[source]
        source: DbError,
    },

    /// Template lookup or rendering failed (G005)
    #[error("[G005] {0}")]
    Template(#[from] TemplateError),

    /// Computed test name is over the framework's limit (G006)
    #[error("[G006] Test name is {length} characters, over the limit of {limit}: {name}")]
    TestNameTooLong {
        name: String,
        length: usize,
        limit: usize,
    },

    /// Writing the test file failed (G007)
    #[error("[G007] Writing test '{name}' to {path} failed: {source}")]
    TestWrite {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Object selection failed (G008)
    #[error("[G008] {0}")]
    Selection(#[from] CoreError),
}

/// Result type alias for GenError
pub type GenResult<T> = Result<T, GenError>;

impl GenError {
    /// Whether this error only affects one object and the run can continue
    pub fn is_per_object(&self) -> bool {
        matches!(
            self,
            GenError::MetadataFetch { .. }
                | GenError::TestNameTooLong { .. }
                | GenError::TestWrite { .. }
        )
    }
}
