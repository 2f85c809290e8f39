// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material hints carried by model files

use super::{MaterialKey, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-effort material information extracted from a model payload.
///
/// `metallic` and `roughness` come from dedicated statements of the source
/// format. Everything else numeric lands in `metadata` under the name the
/// source used; schema keys are looked up there by their key string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialHints {
    pub name: Option<String>,
    pub color: Option<Rgb>,
    pub metallic: Option<f64>,
    pub roughness: Option<f64>,
    pub metadata: BTreeMap<String, f64>,
}

impl MaterialHints {
    /// Hint for one schema key, if the source carried it
    pub fn value(&self, key: MaterialKey) -> Option<f64> {
        match key {
            MaterialKey::Metallic => self.metallic,
            MaterialKey::Roughness => self.roughness,
            other => self.metadata.get(other.as_str()).copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.metallic.is_none()
            && self.roughness.is_none()
            && self.metadata.is_empty()
    }
}
