// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material instances and validated edits

use super::{MaterialHints, MaterialKey, Rgb};
use crate::error::{PartDiffError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_MATERIAL_NAME: &str = "Default";
pub const DEFAULT_COLOR: Rgb = Rgb::new(0xb0, 0xb0, 0xb0);

/// Material of one part. Holds a value for every schema key, each within
/// the key's declared range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialInstance {
    name: String,
    color: Rgb,
    values: BTreeMap<MaterialKey, f64>,
}

/// A single edit to a material instance
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialUpdate {
    Name(String),
    Color(Rgb),
    Property(MaterialKey, f64),
}

impl MaterialUpdate {
    /// Interpret a `key`/`value` pair as supplied by a host (`name`,
    /// `color`, or a schema key). Malformed values are reported as
    /// `Config` errors since they never reach the schema check.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        match key.trim() {
            "name" => Ok(MaterialUpdate::Name(value.trim().to_string())),
            "color" => value
                .parse()
                .map(MaterialUpdate::Color)
                .map_err(PartDiffError::Config),
            other => {
                let key: MaterialKey = other.parse().map_err(PartDiffError::Config)?;
                let number: f64 = value.trim().parse().map_err(|_| {
                    PartDiffError::Config(format!("{} expects a number, got {:?}", key, value))
                })?;
                Ok(MaterialUpdate::Property(key, number))
            }
        }
    }
}

impl MaterialInstance {
    /// Instance with every property at its schema default
    pub fn create_default() -> Self {
        Self {
            name: DEFAULT_MATERIAL_NAME.to_string(),
            color: DEFAULT_COLOR,
            values: MaterialKey::ALL
                .into_iter()
                .map(|key| (key, key.spec().default))
                .collect(),
        }
    }

    /// Seed an instance from embedded hints. Present hints win, absent
    /// ones fall back to the defaults. Numeric hints are clamped into
    /// range and non-finite ones are ignored, so this never fails.
    pub fn from_hints(hints: &MaterialHints) -> Self {
        let mut material = Self::create_default();

        if let Some(name) = hints.name.as_ref().filter(|name| !name.trim().is_empty()) {
            material.name = name.clone();
        }
        if let Some(color) = hints.color {
            material.color = color;
        }

        for key in MaterialKey::ALL {
            match hints.value(key) {
                Some(value) if value.is_finite() => {
                    let spec = key.spec();
                    let clamped = spec.clamp(value);
                    if clamped != value {
                        debug!(%key, value, clamped, "material hint clamped into range");
                    }
                    material.values.insert(key, clamped);
                }
                Some(value) => debug!(%key, value, "ignoring non-finite material hint"),
                None => {}
            }
        }

        material
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn get(&self, key: MaterialKey) -> f64 {
        self.values
            .get(&key)
            .copied()
            .unwrap_or(key.spec().default)
    }

    /// All numeric values in schema order
    pub fn values(&self) -> impl Iterator<Item = (MaterialKey, f64)> + '_ {
        self.values.iter().map(|(key, value)| (*key, *value))
    }

    /// Set a numeric property. Values outside the schema range (or not
    /// finite) are rejected and leave the instance unchanged.
    pub fn set(&mut self, key: MaterialKey, value: f64) -> Result<&Self> {
        let spec = key.spec();
        if !spec.contains(value) {
            return Err(PartDiffError::OutOfRange {
                key,
                value,
                min: spec.min,
                max: spec.max,
            });
        }

        self.values.insert(key, value);
        Ok(self)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &Self {
        self.name = name.into();
        self
    }

    pub fn set_color(&mut self, color: Rgb) -> &Self {
        self.color = color;
        self
    }

    /// Apply one edit
    pub fn apply(&mut self, update: MaterialUpdate) -> Result<&Self> {
        match update {
            MaterialUpdate::Name(name) => Ok(self.set_name(name)),
            MaterialUpdate::Color(color) => Ok(self.set_color(color)),
            MaterialUpdate::Property(key, value) => self.set(key, value),
        }
    }
}

impl Default for MaterialInstance {
    fn default() -> Self {
        Self::create_default()
    }
}
