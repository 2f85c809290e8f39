// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material property schema

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric material properties tracked for every part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKey {
    Metallic,
    Roughness,
    Density,
    YoungsModulus,
    ThermalConductivity,
}

/// Display metadata, default and accepted range of one property
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertySpec {
    pub key: MaterialKey,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl PropertySpec {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

const SCHEMA: [PropertySpec; 5] = [
    PropertySpec {
        key: MaterialKey::Metallic,
        display_name: "Metallic",
        unit: "",
        default: 0.0,
        min: 0.0,
        max: 1.0,
    },
    PropertySpec {
        key: MaterialKey::Roughness,
        display_name: "Roughness",
        unit: "",
        default: 0.5,
        min: 0.0,
        max: 1.0,
    },
    PropertySpec {
        key: MaterialKey::Density,
        display_name: "Density",
        unit: "g/cm³",
        default: 7.85,
        min: 0.1,
        max: 25.0,
    },
    PropertySpec {
        key: MaterialKey::YoungsModulus,
        display_name: "Young's Modulus",
        unit: "GPa",
        default: 200.0,
        min: 0.001,
        max: 1200.0,
    },
    PropertySpec {
        key: MaterialKey::ThermalConductivity,
        display_name: "Thermal Conductivity",
        unit: "W/(m·K)",
        default: 50.0,
        min: 0.01,
        max: 2500.0,
    },
];

/// The full schema, in display order
pub fn schema() -> &'static [PropertySpec] {
    &SCHEMA
}

impl MaterialKey {
    pub const ALL: [MaterialKey; 5] = [
        MaterialKey::Metallic,
        MaterialKey::Roughness,
        MaterialKey::Density,
        MaterialKey::YoungsModulus,
        MaterialKey::ThermalConductivity,
    ];

    pub fn spec(self) -> &'static PropertySpec {
        &SCHEMA[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialKey::Metallic => "metallic",
            MaterialKey::Roughness => "roughness",
            MaterialKey::Density => "density",
            MaterialKey::YoungsModulus => "youngs_modulus",
            MaterialKey::ThermalConductivity => "thermal_conductivity",
        }
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown material property: {}", s))
    }
}
