//! Test file emission

use crate::error::{GenError, GenResult};
use crate::naming::{test_name, TestCategory, TestTarget, MAX_TEST_NAME_LEN};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A named test that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTest {
    pub name: String,
    pub category: TestCategory,
    pub target: TestTarget,
}

/// Record of one emitted test
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Test procedure name
    pub test_name: String,

    /// Category label (existence, columns, ...)
    pub category: String,

    /// Author recorded in the test
    pub creator: String,

    /// Path of the test file
    pub file_name: PathBuf,

    /// Object or database the test is about
    pub target: TestTarget,

    /// False on dry runs
    pub written: bool,

    /// Another test of this run already wrote the same file
    pub collision: bool,
}

/// Names tests and writes them to the output directory.
///
/// Existing files are overwritten. Tests that resolve to a file already
/// written by this emitter are counted as collisions; the later test still
/// replaces the earlier file.
#[derive(Debug)]
pub struct TestEmitter {
    output_dir: PathBuf,
    creator: String,
    dry_run: bool,
    dir_ready: bool,
    emitted: HashSet<PathBuf>,
    collisions: usize,
}

impl TestEmitter {
    pub fn new(output_dir: impl Into<PathBuf>, creator: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            creator: creator.to_string(),
            dry_run: false,
            dir_ready: false,
            emitted: HashSet::new(),
            collisions: 0,
        }
    }

    /// Name and render tests without touching the file system
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of tests that reused an earlier test's file so far
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Compute the test name, rejecting names over [`MAX_TEST_NAME_LEN`]
    pub fn plan(&self, category: TestCategory, target: TestTarget) -> GenResult<PlannedTest> {
        let name = test_name(&category, &target);
        let length = name.chars().count();
        if length > MAX_TEST_NAME_LEN {
            return Err(GenError::TestNameTooLong {
                name,
                length,
                limit: MAX_TEST_NAME_LEN,
            });
        }
        Ok(PlannedTest {
            name,
            category,
            target,
        })
    }

    /// File a test is written to.
    ///
    /// Path separators in the name are replaced so the file always lands
    /// directly in the output directory.
    pub fn file_name(&self, test_name: &str) -> PathBuf {
        let stem: String = test_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{stem}.sql"))
    }

    /// Write a rendered test script
    pub fn emit(&mut self, planned: PlannedTest, script: &str) -> GenResult<GenerationResult> {
        let file_name = self.file_name(&planned.name);

        let collision = !self.emitted.insert(file_name.clone());
        if collision {
            self.collisions += 1;
            log::warn!(
                "Test '{}' resolves to a file already generated in this run; {} will be overwritten",
                planned.name,
                file_name.display()
            );
        }

        if !self.dry_run {
            self.ensure_output_dir(&planned.name)?;
            std::fs::write(&file_name, script).map_err(|e| GenError::TestWrite {
                name: planned.name.clone(),
                path: file_name.display().to_string(),
                source: e,
            })?;
            log::debug!("Wrote {}", file_name.display());
        }

        Ok(GenerationResult {
            test_name: planned.name,
            category: planned.category.label().to_string(),
            creator: self.creator.clone(),
            file_name,
            target: planned.target,
            written: !self.dry_run,
            collision,
        })
    }

    fn ensure_output_dir(&mut self, test_name: &str) -> GenResult<()> {
        if self.dir_ready {
            return Ok(());
        }
        std::fs::create_dir_all(&self.output_dir).map_err(|e| GenError::TestWrite {
            name: test_name.to_string(),
            path: self.output_dir.display().to_string(),
            source: e,
        })?;
        self.dir_ready = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
