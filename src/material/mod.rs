// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material model - property schema, per-part instances and seeding from
//! embedded hints

mod color;
mod hints;
mod instance;
mod schema;

pub use color::Rgb;
pub use hints::MaterialHints;
pub use instance::{MaterialInstance, MaterialUpdate, DEFAULT_COLOR, DEFAULT_MATERIAL_NAME};
pub use schema::{schema, MaterialKey, PropertySpec};
