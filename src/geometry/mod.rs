// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, scene flattening and statistics

mod bbox;
mod mesh;
mod normalize;
mod scene;
mod stats;

pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle};
pub use normalize::{normalize, Normalized};
pub use scene::{Geometry, SceneNode};
pub use stats::{compute_statistics, Dimensions, Statistics};
