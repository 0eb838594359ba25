//! sc-core - Core library for Schemacheck
//!
//! This crate provides the shared data model (schema objects, catalog
//! attribute rows, exclusion sets), configuration parsing, and the object
//! selector used by every other Schemacheck component.

pub mod attribute;
pub mod config;
pub mod error;
pub mod object;
pub mod selector;
pub mod sql_utils;

pub use attribute::{AttributeKind, AttributeRow};
pub use config::{Config, DbType, FrameworkConfig, Phase};
pub use error::{CoreError, CoreResult};
pub use object::{ExclusionSet, ObjectKind, SchemaObject};
pub use selector::{select_objects, ObjectFilter};
