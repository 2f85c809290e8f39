// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront MTL material libraries

use super::statements::tokenize;
use super::MeshFormat;
use crate::error::Result;
use crate::material::{MaterialHints, Rgb};
use tracing::debug;

const FORMAT: MeshFormat = MeshFormat::Obj;

/// Read every `newmtl` block of a library as material hints.
///
/// `Kd` becomes the color, `Pm`/`Pr` the PBR metallic and roughness
/// extensions. Any other statement with a single numeric argument (for
/// example `density 2.7`) is kept as opaque metadata under its keyword.
pub fn parse_mtl(bytes: &[u8]) -> Result<Vec<MaterialHints>> {
    let statements = tokenize(bytes, FORMAT)?;
    let mut materials: Vec<MaterialHints> = Vec::new();

    for statement in &statements {
        if statement.keyword.text == "newmtl" {
            materials.push(MaterialHints {
                name: Some(statement.rest()),
                ..MaterialHints::default()
            });
            continue;
        }

        let Some(current) = materials.last_mut() else {
            debug!(
                keyword = statement.keyword.text,
                line = statement.keyword.line,
                "ignoring material statement before newmtl"
            );
            continue;
        };

        match statement.keyword.text {
            "Kd" => match statement.arguments.first().map(|token| token.text) {
                Some("spectral") | Some("xyz") => {
                    debug!(
                        line = statement.keyword.line,
                        "ignoring non-RGB diffuse color"
                    );
                }
                _ if statement.arguments.len() == 1 => {
                    let gray = statement.number(FORMAT, 0)?;
                    current.color = Some(Rgb::from_unit(gray, gray, gray));
                }
                _ => {
                    current.color = Some(Rgb::from_unit(
                        statement.number(FORMAT, 0)?,
                        statement.number(FORMAT, 1)?,
                        statement.number(FORMAT, 2)?,
                    ));
                }
            },
            "Pm" => current.metallic = Some(statement.number(FORMAT, 0)?),
            "Pr" => current.roughness = Some(statement.number(FORMAT, 0)?),
            keyword if statement.arguments.len() == 1 => {
                if let Ok(value) = statement.arguments[0].text.parse::<f64>() {
                    current.metadata.insert(keyword.to_string(), value);
                }
            }
            _ => {}
        }
    }

    Ok(materials)
}
