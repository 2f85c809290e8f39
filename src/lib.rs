// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Partdiff
//!
//! Mesh ingestion, statistics and part comparison. Loads STL and OBJ models
//! into an "original" and a "modified" slot, attaches an editable material
//! to each, and reports signed percentage differences between the two.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod material;
pub mod workbench;

pub use compare::{compare, percent_diff, ComparisonReport};
pub use config::EngineConfig;
pub use error::{ErrorKind, PartDiffError, Result};
pub use geometry::{Mesh, SceneNode, Statistics};
pub use io::{MeshFormat, ParsedModel};
pub use material::{MaterialInstance, MaterialKey, MaterialUpdate};
pub use workbench::{PartSlot, PartSnapshot, Workbench};

/// Statistics of a single model payload, with the default size limit
pub fn analyze(bytes: &[u8], format: MeshFormat) -> Result<Statistics> {
    let model = io::parse(bytes, format)?;
    let normalized = geometry::normalize(&model.root)?;
    Ok(geometry::compute_statistics(
        &normalized.mesh,
        &normalized.bounds,
    ))
}
