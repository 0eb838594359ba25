//! Generation phases over a catalog
//!
//! Phases run in [`Phase::ALL`] order. Inside a phase every selected object
//! is handled on its own: fetch metadata, skip when there is none, render,
//! write. A failing object is recorded and the phase moves on. A template
//! that cannot be rendered fails its category once; the phase continues with
//! its other categories. A failing phase is recorded and the next phase
//! still runs.

use crate::emitter::{GenerationResult, TestEmitter};
use crate::error::{GenError, GenResult};
use crate::naming::{TestCategory, TestTarget};
use sc_core::sql_utils::data_block;
use sc_core::{
    select_objects, AttributeKind, AttributeRow, Config, CoreError, ExclusionSet,
    FrameworkConfig, ObjectFilter, ObjectKind, Phase, SchemaObject,
};
use sc_db::Catalog;
use sc_template::{tokens, PlaceholderValues, RenderContext, TemplateRenderer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Settings for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory the test files are written to
    pub output_dir: PathBuf,

    /// Test class (schema) the tests are created in
    pub test_class: String,

    pub framework: FrameworkConfig,

    /// Phases not to run
    pub skip: BTreeSet<Phase>,

    /// Per-kind schema and name filters
    pub filters: BTreeMap<ObjectKind, ObjectFilter>,

    /// Externally supplied objects, instead of the full catalog listing
    pub explicit: Option<Vec<SchemaObject>>,

    /// Render without writing files
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>, test_class: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            test_class: test_class.to_string(),
            framework: FrameworkConfig::default(),
            skip: BTreeSet::new(),
            filters: BTreeMap::new(),
            explicit: None,
            dry_run: false,
        }
    }

    /// Options from a project configuration, paths resolved against `root`
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            output_dir: config.output_path_absolute(root),
            test_class: config.test_class.clone(),
            framework: config.framework.clone(),
            skip: config.skip.iter().copied().collect(),
            filters: config.filters.clone(),
            explicit: None,
            dry_run: false,
        }
    }

    pub fn runs_phase(&self, phase: Phase) -> bool {
        !self.skip.contains(&phase)
    }

    fn filter_for(&self, kind: ObjectKind) -> ObjectFilter {
        self.filters.get(&kind).cloned().unwrap_or_default()
    }

    /// Explicit objects of one kind; empty explicit input counts as none
    fn explicit_of(&self, kind: ObjectKind) -> Option<Vec<SchemaObject>> {
        self.explicit.as_ref().filter(|e| !e.is_empty()).map(|objects| {
            objects
                .iter()
                .filter(|o| o.object_type == kind)
                .cloned()
                .collect()
        })
    }

    fn has_selector(&self) -> bool {
        self.explicit.as_ref().is_some_and(|e| !e.is_empty())
            || self.filters.values().any(|f| !f.is_empty())
    }
}

/// An object left out of the run because of a per-object error
#[derive(Debug, Clone, Serialize)]
pub struct SkippedObject {
    pub phase: Phase,
    pub target: TestTarget,
    pub category: String,
    pub error: String,
}

/// A phase that stopped early
#[derive(Debug, Clone, Serialize)]
pub struct PhaseFailure {
    pub phase: Phase,
    pub error: String,
}

/// Overall result of a run that started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "skipped", rename_all = "snake_case")]
pub enum RunOutcome {
    Clean,
    CompletedWithSkips(usize),
}

/// Everything a run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub results: Vec<GenerationResult>,
    pub skipped: Vec<SkippedObject>,
    pub phase_failures: Vec<PhaseFailure>,
    pub collisions: usize,
}

impl GenerationReport {
    /// Clean, or completed with this many skipped objects and failed phases
    pub fn outcome(&self) -> RunOutcome {
        let skips = self.skipped.len() + self.phase_failures.len();
        if skips == 0 {
            RunOutcome::Clean
        } else {
            RunOutcome::CompletedWithSkips(skips)
        }
    }

    pub fn has_phase_failures(&self) -> bool {
        !self.phase_failures.is_empty()
    }

    /// Results of one category label
    pub fn results_for(&self, category: &str) -> impl Iterator<Item = &GenerationResult> {
        let category = category.to_string();
        self.results.iter().filter(move |r| r.category == category)
    }
}

/// Runs the generation phases
pub struct Generator<'a> {
    catalog: Option<&'a dyn Catalog>,
    renderer: &'a TemplateRenderer,
    context: RenderContext,
    options: GenerateOptions,
}

/// Per-run state shared by the phases
struct RunState {
    database: Option<String>,
    exclusions: ExclusionSet,
    selections: HashMap<ObjectKind, Vec<SchemaObject>>,
    emitter: TestEmitter,
    report: GenerationReport,
    /// Templates that failed to render, skipped for the rest of the run
    failed_templates: HashSet<&'static str>,
}

impl<'a> Generator<'a> {
    /// Create a generator.
    ///
    /// Without a catalog only existence tests can be generated, for objects
    /// named by explicit input or filters.
    pub fn new(
        catalog: Option<&'a dyn Catalog>,
        renderer: &'a TemplateRenderer,
        context: RenderContext,
        options: GenerateOptions,
    ) -> Self {
        Self {
            catalog,
            renderer,
            context,
            options,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Run every enabled phase.
    ///
    /// Returns `Err` only when the run cannot start; per-object and
    /// per-phase failures end up in the report.
    pub async fn run(&self) -> GenResult<GenerationReport> {
        if self.options.test_class.trim().is_empty() {
            return Err(GenError::Configuration {
                message: "test class cannot be empty".to_string(),
            });
        }
        let output_dir = &self.options.output_dir;
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(GenError::Configuration {
                message: format!("output path {} is not a directory", output_dir.display()),
            });
        }

        let (database, exclusions) = match self.catalog {
            Some(catalog) => {
                let database = catalog
                    .database_name()
                    .await
                    .map_err(|source| GenError::Connection { source })?;
                let exclusions = catalog
                    .excluded_schemas(&self.options.framework)
                    .await
                    .map_err(|source| GenError::Connection { source })?;
                log::debug!(
                    "Connected to {} database {} ({} excluded schemas)",
                    catalog.backend(),
                    database,
                    exclusions.len()
                );
                (Some(database), exclusions)
            }
            None => {
                if !self.options.has_selector() {
                    return Err(GenError::Selection(CoreError::MissingSelector {
                        kind: "any object".to_string(),
                    }));
                }
                (
                    None,
                    ExclusionSet::framework_only(&self.options.framework.schema),
                )
            }
        };

        if !self.options.dry_run {
            std::fs::create_dir_all(output_dir).map_err(|e| GenError::Configuration {
                message: format!("cannot create output path {}: {e}", output_dir.display()),
            })?;
        }

        let mut state = RunState {
            database,
            exclusions,
            selections: HashMap::new(),
            emitter: TestEmitter::new(&self.options.output_dir, &self.context.creator)
                .dry_run(self.options.dry_run),
            report: GenerationReport::default(),
            failed_templates: HashSet::new(),
        };

        for phase in Phase::ALL {
            if !self.options.runs_phase(phase) {
                log::debug!("Skipping phase {phase}");
                continue;
            }
            if let Err(e) = self.run_phase(phase, &mut state).await {
                log::error!("Phase {phase} failed: {e}");
                state.report.phase_failures.push(PhaseFailure {
                    phase,
                    error: e.to_string(),
                });
            }
        }

        state.report.collisions = state.emitter.collisions();
        Ok(state.report)
    }

    async fn run_phase(&self, phase: Phase, state: &mut RunState) -> GenResult<()> {
        match phase {
            Phase::Collation => self.collation_phase(state).await,
            Phase::Functions => {
                self.object_phase(
                    phase,
                    ObjectKind::Function,
                    &[
                        TestCategory::Existence(ObjectKind::Function),
                        TestCategory::FunctionParameters,
                    ],
                    state,
                )
                .await
            }
            Phase::Procedures => {
                self.object_phase(
                    phase,
                    ObjectKind::Procedure,
                    &[
                        TestCategory::Existence(ObjectKind::Procedure),
                        TestCategory::ProcedureParameters,
                    ],
                    state,
                )
                .await?;
                self.object_phase(
                    phase,
                    ObjectKind::ExtendedProcedure,
                    &[TestCategory::Existence(ObjectKind::ExtendedProcedure)],
                    state,
                )
                .await
            }
            Phase::Tables => {
                self.object_phase(
                    phase,
                    ObjectKind::Table,
                    &[
                        TestCategory::Existence(ObjectKind::Table),
                        TestCategory::TableColumns,
                    ],
                    state,
                )
                .await
            }
            Phase::TableIndexes => {
                self.object_phase(phase, ObjectKind::Table, &[TestCategory::TableIndexes], state)
                    .await
            }
            Phase::IndexColumns => self.index_columns_phase(state).await,
            Phase::Views => {
                self.object_phase(
                    phase,
                    ObjectKind::View,
                    &[
                        TestCategory::Existence(ObjectKind::View),
                        TestCategory::ViewColumns,
                    ],
                    state,
                )
                .await
            }
            Phase::Constraints => {
                self.object_phase(
                    phase,
                    ObjectKind::Table,
                    &[TestCategory::TableConstraints],
                    state,
                )
                .await
            }
            Phase::ForeignKeys => {
                self.object_phase(phase, ObjectKind::Table, &[TestCategory::ForeignKeys], state)
                    .await
            }
            Phase::Sequences => {
                self.object_phase(
                    phase,
                    ObjectKind::Sequence,
                    &[TestCategory::Existence(ObjectKind::Sequence)],
                    state,
                )
                .await
            }
            Phase::UserTypes => {
                for kind in [
                    ObjectKind::UserDefinedDataType,
                    ObjectKind::UserDefinedTableType,
                ] {
                    self.object_phase(phase, kind, &[TestCategory::Existence(kind)], state)
                        .await?;
                }
                Ok(())
            }
        }
    }

    async fn collation_phase(&self, state: &mut RunState) -> GenResult<()> {
        let (Some(catalog), Some(database)) = (self.catalog, state.database.clone()) else {
            log::debug!("No catalog connection, skipping the collation test");
            return Ok(());
        };
        let target = TestTarget::Database {
            name: database.clone(),
        };
        let category = TestCategory::DatabaseCollation;
        let collation = match catalog.database_collation().await {
            Ok(collation) => collation,
            Err(source) => {
                let err = GenError::MetadataFetch {
                    object: target.to_string(),
                    category: category.label().to_string(),
                    source,
                };
                self.skip(Phase::Collation, target, category.label(), err, state);
                return Ok(());
            }
        };

        let values = self
            .base_values()
            .literal(tokens::DATABASE, &database)
            .literal(tokens::COLLATION, &collation);
        self.emit_one(
            Phase::Collation,
            category,
            target,
            values,
            state,
        )
    }

    async fn object_phase(
        &self,
        phase: Phase,
        kind: ObjectKind,
        categories: &[TestCategory],
        state: &mut RunState,
    ) -> GenResult<()> {
        let objects = self.selection(kind, state).await?;
        for object in &objects {
            for category in categories {
                self.object_test(phase, category.clone(), object, state)
                    .await?;
            }
        }
        Ok(())
    }

    async fn index_columns_phase(&self, state: &mut RunState) -> GenResult<()> {
        let Some(catalog) = self.catalog else {
            log::debug!("No catalog connection, skipping index column tests");
            return Ok(());
        };
        let tables = self.selection(ObjectKind::Table, state).await?;
        for table in &tables {
            let indexes = match catalog.fetch_attributes(&AttributeKind::Indexes, table).await {
                Ok(rows) => rows,
                Err(source) => {
                    let err = GenError::MetadataFetch {
                        object: table.to_string(),
                        category: TestCategory::TableIndexes.label().to_string(),
                        source,
                    };
                    self.skip(
                        Phase::IndexColumns,
                        TestTarget::Object(table.clone()),
                        TestCategory::TableIndexes.label(),
                        err,
                        state,
                    );
                    continue;
                }
            };
            for index in indexes {
                let category = TestCategory::IndexColumns {
                    index: index.name().to_string(),
                };
                self.object_test(Phase::IndexColumns, category, table, state)
                    .await?;
            }
        }
        Ok(())
    }

    /// Generate one test for one object.
    ///
    /// Per-object errors are recorded as skips and template failures as a
    /// failure of the category; anything else ends the phase.
    async fn object_test(
        &self,
        phase: Phase,
        category: TestCategory,
        object: &SchemaObject,
        state: &mut RunState,
    ) -> GenResult<()> {
        if state.failed_templates.contains(category.template()) {
            return Ok(());
        }

        let mut values = self
            .base_values()
            .literal(tokens::SCHEMA, &object.schema)
            .literal(tokens::NAME, &object.name)
            .literal(tokens::OBJECTTYPE, object.object_type.phrase());

        if let TestCategory::IndexColumns { index } = &category {
            values = values.literal(tokens::INDEX, index);
        }

        if let (Some(attribute), Some(token)) = (category.attribute_kind(), category.data_token())
        {
            let Some(catalog) = self.catalog else {
                log::debug!("No catalog connection, skipping {category} test for {object}");
                return Ok(());
            };
            let rows = match catalog.fetch_attributes(&attribute, object).await {
                Ok(rows) => rows,
                Err(source) => {
                    let label = category.label();
                    let err = GenError::MetadataFetch {
                        object: object.to_string(),
                        category: label.to_string(),
                        source,
                    };
                    self.skip(phase, TestTarget::Object(object.clone()), label, err, state);
                    return Ok(());
                }
            };
            if rows.is_empty() {
                log::debug!("No {category} metadata for {object}, no test generated");
                return Ok(());
            }
            values = values.raw(token, rows_block(&rows));
        }

        self.emit_one(
            phase,
            category,
            TestTarget::Object(object.clone()),
            values,
            state,
        )
    }

    fn emit_one(
        &self,
        phase: Phase,
        category: TestCategory,
        target: TestTarget,
        values: PlaceholderValues,
        state: &mut RunState,
    ) -> GenResult<()> {
        let label = category.label();
        let template = category.template();
        if state.failed_templates.contains(template) {
            return Ok(());
        }

        let planned = match state.emitter.plan(category, target.clone()) {
            Ok(planned) => planned,
            Err(e) => {
                self.skip(phase, target, label, e, state);
                return Ok(());
            }
        };

        let values = values.identifier(tokens::TESTNAME, &planned.name);
        let script = match self.renderer.render(template, &values) {
            Ok(script) => script,
            Err(e) => {
                let err = GenError::from(e);
                log::error!("No {label} tests in phase {phase}: {err}");
                state.failed_templates.insert(template);
                state.report.phase_failures.push(PhaseFailure {
                    phase,
                    error: err.to_string(),
                });
                return Ok(());
            }
        };

        match state.emitter.emit(planned, &script) {
            Ok(result) => {
                state.report.results.push(result);
                Ok(())
            }
            Err(e) if e.is_per_object() => {
                self.skip(phase, target, label, e, state);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn skip(
        &self,
        phase: Phase,
        target: TestTarget,
        category: &str,
        err: GenError,
        state: &mut RunState,
    ) {
        log::warn!("Skipping {category} test for {target}: {err}");
        state.report.skipped.push(SkippedObject {
            phase,
            target,
            category: category.to_string(),
            error: err.to_string(),
        });
    }

    /// Objects of `kind` to generate tests for, selected once per run
    async fn selection(
        &self,
        kind: ObjectKind,
        state: &mut RunState,
    ) -> GenResult<Vec<SchemaObject>> {
        if let Some(selected) = state.selections.get(&kind) {
            return Ok(selected.clone());
        }

        let filter = self.options.filter_for(kind);
        let explicit = self.options.explicit_of(kind);

        let selected = if explicit.as_ref().is_some_and(|e| e.is_empty()) {
            // Explicit input was given but names nothing of this kind
            Vec::new()
        } else {
            match self.catalog {
                Some(catalog) => {
                    let universe = catalog
                        .list_objects(kind)
                        .await
                        .map_err(|source| GenError::Enumeration { kind, source })?;
                    select_objects(
                        kind,
                        Some(universe.as_slice()),
                        &state.exclusions,
                        &filter,
                        explicit.as_deref(),
                    )?
                }
                None if explicit.is_none() && filter.is_empty() => Vec::new(),
                None => select_objects(
                    kind,
                    None,
                    &state.exclusions,
                    &filter,
                    explicit.as_deref(),
                )?,
            }
        };

        log::debug!("Selected {} {} objects", selected.len(), kind.phrase());
        state.selections.insert(kind, selected.clone());
        Ok(selected)
    }

    fn base_values(&self) -> PlaceholderValues {
        self.context
            .placeholders()
            .identifier(tokens::TESTCLASS, &self.options.test_class)
    }
}

fn rows_block(rows: &[AttributeRow]) -> String {
    data_block(rows.iter().map(AttributeRow::to_literal_tuple))
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
