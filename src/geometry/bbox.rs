// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use super::Mesh;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Degenerate box at the origin, used for meshes without vertices so
    /// extents come out as zero instead of NaN or infinity.
    pub fn origin() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }

    /// Fold min/max over a sequence of points.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut points = points.into_iter();
        let first = match points.next() {
            Some(point) => *point,
            None => return Self::origin(),
        };

        let mut bbox = Self::new(first, first);
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    /// Bounding box of every vertex of every triangle.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::from_points(mesh.triangles.iter().flat_map(|t| t.vertices.iter()))
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis extents, clamped so a malformed box never reports a
    /// negative size.
    pub fn size(&self) -> Vector3<f64> {
        (self.max - self.min).map(|extent| extent.max(0.0))
    }

    /// Product of the three extents.
    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.min - other.min).amax() < tolerance && (self.max - other.max).amax() < tolerance
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::origin()
    }
}
