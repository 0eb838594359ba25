//! Object selection
//!
//! Turns an object universe into the ordered set of objects to generate
//! tests for:
//! - universe: catalog enumeration, optionally narrowed to explicit input
//!   (or the explicit input itself when there is no catalog)
//! - framework exclusion: always applied, no filter can bring objects back
//! - schema filter, then name filter (`Orders` or `Sales.Orders`)
//! - sorted by (schema, name), duplicates removed

use crate::error::{CoreError, CoreResult};
use crate::object::{ExclusionSet, ObjectKind, SchemaObject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Schema and name allow-lists for one object kind.
///
/// An empty list means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectFilter {
    #[serde(default)]
    pub schemas: Vec<String>,

    #[serde(default)]
    pub names: Vec<String>,
}

impl ObjectFilter {
    pub fn new(schemas: Vec<String>, names: Vec<String>) -> Self {
        Self { schemas, names }
    }

    /// Neither schemas nor names are restricted
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.names.is_empty()
    }

    fn allows_schema(&self, schema: &str) -> bool {
        self.schemas.is_empty() || self.schemas.iter().any(|s| s == schema)
    }

    fn allows_name(&self, object: &SchemaObject) -> bool {
        if self.names.is_empty() {
            return true;
        }
        let qualified = object.qualified_name();
        self.names
            .iter()
            .any(|n| *n == object.name || *n == qualified)
    }

    /// Objects named by this filter alone, for runs without a catalog.
    ///
    /// `schema.name` entries name an object directly; bare names are paired
    /// with every schema in the schema filter.
    fn synthesize(&self, kind: ObjectKind) -> Vec<SchemaObject> {
        let mut objects = Vec::new();
        for entry in &self.names {
            match entry.split_once('.') {
                Some((schema, name)) if kind.has_schema() => {
                    objects.push(SchemaObject::new(schema, name, kind));
                }
                _ if !kind.has_schema() => {
                    objects.push(SchemaObject::new("", entry.as_str(), kind));
                }
                _ if self.schemas.is_empty() => {
                    log::warn!(
                        "Cannot resolve {} '{}' without a schema or a database connection",
                        kind.phrase(),
                        entry
                    );
                }
                _ => {
                    for schema in &self.schemas {
                        objects.push(SchemaObject::new(schema.as_str(), entry.as_str(), kind));
                    }
                }
            }
        }
        objects
    }
}

/// Select the objects of `kind` to generate tests for.
///
/// `universe` is the catalog enumeration (`None` when running without a
/// database connection). `explicit` is externally supplied input; an empty
/// slice counts as not supplied.
///
/// Returns [`CoreError::MissingSelector`] when there is no catalog, no
/// explicit input and no filter to select from.
pub fn select_objects(
    kind: ObjectKind,
    universe: Option<&[SchemaObject]>,
    exclusions: &ExclusionSet,
    filter: &ObjectFilter,
    explicit: Option<&[SchemaObject]>,
) -> CoreResult<Vec<SchemaObject>> {
    let explicit: Option<Vec<&SchemaObject>> = explicit
        .map(|objs| objs.iter().filter(|o| o.object_type == kind).collect::<Vec<_>>())
        .filter(|objs| !objs.is_empty());

    let start: Vec<SchemaObject> = match (universe, explicit) {
        (Some(universe), Some(explicit)) => {
            let names: BTreeSet<&str> = explicit.iter().map(|o| o.name.as_str()).collect();
            universe
                .iter()
                .filter(|o| o.object_type == kind && names.contains(o.name.as_str()))
                .cloned()
                .collect()
        }
        (Some(universe), None) => universe
            .iter()
            .filter(|o| o.object_type == kind)
            .cloned()
            .collect(),
        (None, Some(explicit)) => explicit.into_iter().cloned().collect(),
        (None, None) => {
            if filter.is_empty() {
                return Err(CoreError::MissingSelector {
                    kind: kind.phrase().to_string(),
                });
            }
            filter.synthesize(kind)
        }
    };

    let selected: BTreeSet<SchemaObject> = start
        .into_iter()
        .filter(|o| !exclusions.is_excluded(&o.schema))
        .filter(|o| filter.allows_schema(&o.schema))
        .filter(|o| filter.allows_name(o))
        .collect();

    Ok(selected.into_iter().collect())
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
