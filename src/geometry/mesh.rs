// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation

use super::BoundingBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangle defined by three absolute vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

/// Triangle soup. Vertices are not shared between triangles, so a vertex
/// used by several triangles is stored (and counted) once per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append every triangle of another mesh, keeping their order
    pub fn merge(&mut self, other: &Mesh) {
        self.triangles.extend_from_slice(&other.triangles);
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_mesh(self)
    }

    /// Vertex entries across all triangles, duplicates included
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_counts_do_not_deduplicate() {
        // Two triangles sharing an edge still report six vertices.
        let mut mesh = Mesh::new();
        mesh.add_triangle(unit_triangle());
        mesh.add_triangle(Triangle::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ));

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a: Mesh = std::iter::once(unit_triangle()).collect();
        let shifted = Triangle::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        );
        let b: Mesh = std::iter::once(shifted).collect();

        a.merge(&b);
        assert_eq!(a.triangles, vec![unit_triangle(), shifted]);
        assert_eq!(a.bounding_box().max, Point3::new(1.0, 1.0, 1.0));
    }
}
