// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Comparison of two parts

use super::percent::{count_diff, percent_diff};
use crate::error::{PartDiffError, Result};
use crate::geometry::{Dimensions, Statistics};
use crate::material::{MaterialInstance, MaterialKey};
use crate::workbench::PartSlot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Percentage change of each extent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DimensionDiff {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl DimensionDiff {
    fn between(modified: &Dimensions, original: &Dimensions) -> Self {
        Self {
            x: percent_diff(modified.x, original.x),
            y: percent_diff(modified.y, original.y),
            z: percent_diff(modified.z, original.z),
        }
    }
}

/// Material differences between the two parts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialDiffs {
    /// Exact color inequality, no tolerance
    pub color_changed: bool,
    pub name_changed: bool,
    /// Percentage change of every numeric schema property
    pub properties: BTreeMap<MaterialKey, f64>,
}

impl MaterialDiffs {
    fn between(modified: &MaterialInstance, original: &MaterialInstance) -> Self {
        Self {
            color_changed: modified.color() != original.color(),
            name_changed: modified.name() != original.name(),
            properties: MaterialKey::ALL
                .into_iter()
                .map(|key| (key, percent_diff(modified.get(key), original.get(key))))
                .collect(),
        }
    }

    pub fn property(&self, key: MaterialKey) -> f64 {
        self.properties.get(&key).copied().unwrap_or(0.0)
    }
}

/// The figures one side of the comparison was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartFigures {
    pub statistics: Statistics,
    pub approximate_volume: f64,
    pub material: MaterialInstance,
}

impl PartFigures {
    fn new(statistics: &Statistics, material: &MaterialInstance) -> Self {
        Self {
            statistics: *statistics,
            approximate_volume: statistics.approximate_volume(),
            material: material.clone(),
        }
    }
}

/// Immutable comparison snapshot. Percentages are signed changes from the
/// original part to the modified part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub vertex_diff: f64,
    pub face_diff: f64,
    pub dimension_diff: DimensionDiff,
    /// Change of the bounding-box volume proxy
    pub volume_diff: f64,
    pub material_diffs: MaterialDiffs,
    pub original: PartFigures,
    pub modified: PartFigures,
    pub timestamp: DateTime<Utc>,
}

impl ComparisonReport {
    /// Equal in every field except the timestamp
    pub fn same_figures(&self, other: &ComparisonReport) -> bool {
        let aligned = ComparisonReport {
            timestamp: other.timestamp,
            ..self.clone()
        };
        aligned == *other
    }
}

/// Compare two parts, stamped with the current time.
///
/// Both parts must have statistics; a missing side fails with
/// `IncompleteInput` instead of producing a partial report.
pub fn compare(
    original: Option<&Statistics>,
    modified: Option<&Statistics>,
    original_material: &MaterialInstance,
    modified_material: &MaterialInstance,
) -> Result<ComparisonReport> {
    compare_at(
        original,
        modified,
        original_material,
        modified_material,
        Utc::now(),
    )
}

/// [`compare`] with an explicit timestamp
pub fn compare_at(
    original: Option<&Statistics>,
    modified: Option<&Statistics>,
    original_material: &MaterialInstance,
    modified_material: &MaterialInstance,
    timestamp: DateTime<Utc>,
) -> Result<ComparisonReport> {
    let original = original.ok_or(PartDiffError::IncompleteInput {
        slot: PartSlot::Original,
    })?;
    let modified = modified.ok_or(PartDiffError::IncompleteInput {
        slot: PartSlot::Modified,
    })?;

    Ok(ComparisonReport {
        vertex_diff: count_diff(modified.vertex_count, original.vertex_count),
        face_diff: count_diff(modified.face_count, original.face_count),
        dimension_diff: DimensionDiff::between(&modified.dimensions, &original.dimensions),
        volume_diff: percent_diff(
            modified.approximate_volume(),
            original.approximate_volume(),
        ),
        material_diffs: MaterialDiffs::between(modified_material, original_material),
        original: PartFigures::new(original, original_material),
        modified: PartFigures::new(modified, modified_material),
        timestamp,
    })
}
