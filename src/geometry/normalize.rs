// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene flattening

use super::{BoundingBox, Geometry, Mesh, SceneNode, Triangle};
use crate::error::{PartDiffError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One aggregate mesh and its bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub mesh: Mesh,
    pub bounds: BoundingBox,
}

/// Flatten a scene depth-first into one mesh and compute its bounds.
///
/// Triangles keep the order in which their nodes are visited. Fails with
/// `IncompleteGeometry` when a mesh node has no positions, in which case
/// nothing is produced for the whole scene.
pub fn normalize(root: &SceneNode) -> Result<Normalized> {
    let mut mesh = Mesh::new();
    flatten_into(root, &mut mesh)?;
    let bounds = mesh.bounding_box();

    debug!(
        triangles = mesh.triangle_count(),
        meshes = root.mesh_count(),
        "normalized scene"
    );

    Ok(Normalized { mesh, bounds })
}

fn flatten_into(node: &SceneNode, out: &mut Mesh) -> Result<()> {
    match node {
        SceneNode::Mesh { name, geometry } => expand_geometry(name, geometry, out),
        SceneNode::Group { children, .. } => {
            for child in children {
                flatten_into(child, out)?;
            }
            Ok(())
        }
        SceneNode::Other { name, kind } => {
            trace!(name = %name, kind = %kind, "skipping non-mesh node");
            Ok(())
        }
    }
}

fn expand_geometry(name: &str, geometry: &Geometry, out: &mut Mesh) -> Result<()> {
    let positions = geometry
        .positions
        .as_ref()
        .ok_or_else(|| PartDiffError::IncompleteGeometry {
            node: name.to_string(),
            missing: "position",
        })?;

    out.triangles.reserve(geometry.face_count());

    match &geometry.indices {
        None => {
            for corners in positions.chunks_exact(3) {
                out.add_triangle(Triangle::new(corners[0], corners[1], corners[2]));
            }
        }
        Some(indices) => {
            for corners in indices.chunks_exact(3) {
                let mut vertices = [Point3::origin(); 3];
                for (slot, &index) in vertices.iter_mut().zip(corners) {
                    *slot = *positions.get(index).ok_or_else(|| {
                        PartDiffError::IncompleteGeometry {
                            node: name.to_string(),
                            missing: "indexed position",
                        }
                    })?;
                }
                out.add_triangle(Triangle { vertices });
            }
        }
    }

    Ok(())
}
