//! sc-gen - Schema test generation for Schemacheck
//!
//! This crate names and writes generated tSQLt tests and runs the
//! generation phases (collation, existence, columns, parameters, indexes,
//! constraints, foreign keys) over a catalog.

pub mod emitter;
pub mod error;
pub mod naming;
pub mod orchestrator;

pub use emitter::{GenerationResult, PlannedTest, TestEmitter};
pub use error::{GenError, GenResult};
pub use naming::{test_name, TestCategory, TestTarget, MAX_TEST_NAME_LEN};
pub use orchestrator::{
    GenerateOptions, GenerationReport, Generator, PhaseFailure, RunOutcome, SkippedObject,
};
