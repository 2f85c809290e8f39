// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Command runner backing the `partdiff` binary

use crate::compare::ComparisonReport;
use crate::config::EngineConfig;
use crate::material::{MaterialInstance, MaterialUpdate};
use crate::workbench::{PartSlot, PartSnapshot, Workbench};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of loading one part
pub struct LoadResult {
    pub snapshot: PartSnapshot,
    pub duration: Duration,
}

/// Runs CLI commands against a workbench
pub struct Runner {
    workbench: Workbench,
}

impl Runner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            workbench: Workbench::new(config),
        }
    }

    /// Load a model file (and optional material library) into `slot`
    pub fn load(&self, slot: PartSlot, path: &Path, library: Option<&Path>) -> Result<LoadResult> {
        let start = Instant::now();
        let snapshot = self
            .workbench
            .load_file_with_library(slot, path, library)
            .with_context(|| format!("Failed to load {} part from {}", slot, path.display()))?;

        Ok(LoadResult {
            snapshot,
            duration: start.elapsed(),
        })
    }

    /// Apply `key=value` material assignments to `slot` in order
    pub fn apply_assignments(&self, slot: PartSlot, assignments: &[String]) -> Result<MaterialInstance> {
        let mut material = self.workbench.snapshot(slot).material;
        for assignment in assignments {
            let update = parse_assignment(assignment)?;
            material = self
                .workbench
                .update_material(slot, update)
                .with_context(|| format!("Rejected {} material edit {:?}", slot, assignment))?;
        }
        Ok(material)
    }

    pub fn compare(&self) -> Result<ComparisonReport> {
        self.workbench
            .get_comparison()
            .ok_or_else(|| anyhow!("Both parts must be loaded before comparing"))
    }
}

/// Parse a `key=value` material assignment such as `density=2.7`
pub fn parse_assignment(assignment: &str) -> Result<MaterialUpdate> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected key=value, got {:?}", assignment))?;
    Ok(MaterialUpdate::parse(key, value)?)
}
