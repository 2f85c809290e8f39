// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-part geometry statistics

use super::{BoundingBox, Mesh};
use serde::{Deserialize, Serialize};

/// Extents along each axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Dimensions {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Product of the three extents. This is a bounding-box proxy for the
    /// part's volume, not an integral over its surface.
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

/// Statistics of one loaded part
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Vertex entries across all triangles. Shared vertices count once per
    /// triangle that uses them.
    pub vertex_count: usize,
    pub face_count: usize,
    pub dimensions: Dimensions,
}

impl Statistics {
    /// Statistics of a part with no geometry
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn approximate_volume(&self) -> f64 {
        self.dimensions.volume()
    }
}

/// Derive statistics from a flattened mesh and its bounds.
pub fn compute_statistics(mesh: &Mesh, bounds: &BoundingBox) -> Statistics {
    let size = bounds.size();

    Statistics {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.triangle_count(),
        dimensions: Dimensions::new(size.x, size.y, size.z),
    }
}
