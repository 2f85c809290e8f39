// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph produced by the format parsers

use super::{Mesh, Triangle};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Buffer-style geometry of a single mesh node.
///
/// Without `indices` the positions are read as consecutive triples; with
/// `indices` the indices are. Either way a trailing incomplete triple is
/// dropped, so face counts are always whole numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub positions: Option<Vec<Point3<f64>>>,
    pub indices: Option<Vec<usize>>,
}

impl Geometry {
    /// Non-indexed geometry from a flat position list
    pub fn soup(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions: Some(positions),
            indices: None,
        }
    }

    /// Indexed geometry
    pub fn indexed(positions: Vec<Point3<f64>>, indices: Vec<usize>) -> Self {
        Self {
            positions: Some(positions),
            indices: Some(indices),
        }
    }

    /// `floor(element_count / 3)` where the elements are indices when
    /// present, positions otherwise.
    pub fn face_count(&self) -> usize {
        match (&self.indices, &self.positions) {
            (Some(indices), _) => indices.len() / 3,
            (None, Some(positions)) => positions.len() / 3,
            (None, None) => 0,
        }
    }
}

impl From<&Mesh> for Geometry {
    fn from(mesh: &Mesh) -> Self {
        Geometry::soup(
            mesh.triangles
                .iter()
                .flat_map(|triangle| triangle.vertices)
                .collect(),
        )
    }
}

/// Node of a parsed scene. Traversal matches on this exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneNode {
    Mesh {
        name: String,
        geometry: Geometry,
    },
    Group {
        name: String,
        children: Vec<SceneNode>,
    },
    /// Lights, cameras, polylines, point sets. Carried so nothing is
    /// silently lost, ignored for statistics.
    Other {
        name: String,
        kind: String,
    },
}

impl SceneNode {
    pub fn mesh(name: impl Into<String>, geometry: Geometry) -> Self {
        SceneNode::Mesh {
            name: name.into(),
            geometry,
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        SceneNode::Group {
            name: name.into(),
            children,
        }
    }

    pub fn other(name: impl Into<String>, kind: impl Into<String>) -> Self {
        SceneNode::Other {
            name: name.into(),
            kind: kind.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh { name, .. }
            | SceneNode::Group { name, .. }
            | SceneNode::Other { name, .. } => name,
        }
    }

    /// Get child nodes
    pub fn children(&self) -> &[SceneNode] {
        match self {
            SceneNode::Group { children, .. } => children,
            SceneNode::Mesh { .. } | SceneNode::Other { .. } => &[],
        }
    }

    /// Number of mesh nodes in this subtree
    pub fn mesh_count(&self) -> usize {
        match self {
            SceneNode::Mesh { .. } => 1,
            SceneNode::Group { children, .. } => children.iter().map(SceneNode::mesh_count).sum(),
            SceneNode::Other { .. } => 0,
        }
    }
}

impl From<Mesh> for SceneNode {
    fn from(mesh: Mesh) -> Self {
        SceneNode::mesh("mesh", Geometry::from(&mesh))
    }
}

impl From<Vec<Triangle>> for SceneNode {
    fn from(triangles: Vec<Triangle>) -> Self {
        SceneNode::from(Mesh { triangles })
    }
}
