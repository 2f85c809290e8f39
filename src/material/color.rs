// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Display color

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From unit-range floats as found in MTL `Kd` statements.
    /// Components are clamped to [0, 1]; NaN maps to 0.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        fn channel(value: f64) -> u8 {
            if value.is_nan() {
                0
            } else {
                (value.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        }
        Self::new(channel(r), channel(g), channel(b))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Accepts `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color {:?}: expected #rrggbb", s));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| e.to_string())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color: Rgb = "#1a2B3c".parse().unwrap();
        assert_eq!(color, Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_hex(), "#1a2b3c");
        assert_eq!("ffffff".parse::<Rgb>(), Ok(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_from_unit() {
        assert_eq!(Rgb::from_unit(1.0, 0.5, 0.0), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_unit(2.0, -1.0, f64::NAN), Rgb::new(255, 0, 0));
    }
}
