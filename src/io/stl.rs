// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL reader (binary and ASCII)

use super::{MeshFormat, ParsedModel};
use crate::error::{Location, PartDiffError, Result};
use crate::geometry::{Geometry, SceneNode};
use crate::material::{MaterialHints, Rgb};
use nalgebra::Point3;
use std::io::Cursor;
use stl_io::TriangleIterator;
use tracing::debug;

const FORMAT: MeshFormat = MeshFormat::Stl;
const HEADER_LEN: usize = 80;
const PREAMBLE_LEN: usize = HEADER_LEN + 4;
const TRIANGLE_RECORD_LEN: u64 = 50;
const COLOR_MARKER: &[u8] = b"COLOR=";

/// Encoding of an STL payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlEncoding {
    Ascii,
    Binary,
}

/// Guess the encoding. ASCII files start with `solid`, but so do some
/// binary exporters' headers, so a `solid` prefix only counts as ASCII
/// when the payload does not have the exact length its binary triangle
/// count declares.
pub fn detect_encoding(bytes: &[u8]) -> StlEncoding {
    let trimmed = trim_leading_whitespace(bytes);
    if !trimmed.starts_with(b"solid") {
        return StlEncoding::Binary;
    }

    match declared_binary_len(bytes) {
        Some(expected) if expected == bytes.len() as u64 => StlEncoding::Binary,
        _ => StlEncoding::Ascii,
    }
}

/// Parse an STL payload into a single indexed mesh node.
pub fn parse_stl(bytes: &[u8]) -> Result<ParsedModel> {
    let encoding = detect_encoding(bytes);
    let hints = match encoding {
        StlEncoding::Binary => {
            validate_binary_len(bytes)?;
            header_hints(&bytes[..HEADER_LEN])
        }
        StlEncoding::Ascii => {
            check_ascii_text(bytes)?;
            None
        }
    };

    let mut reader = Cursor::new(bytes);
    let triangles = match encoding {
        StlEncoding::Binary => stl_io::BinaryStlReader::create_triangle_iterator(&mut reader),
        StlEncoding::Ascii => stl_io::AsciiStlReader::create_triangle_iterator(&mut reader),
    };
    let stl = triangles
        .and_then(|mut triangles| triangles.to_indexed_triangles())
        .map_err(|e| PartDiffError::parse(FORMAT, None, e.to_string()))?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    if let Some(index) = positions
        .iter()
        .position(|p| !p.iter().all(|c| c.is_finite()))
    {
        return Err(PartDiffError::parse(
            FORMAT,
            None,
            format!("vertex {} has a non-finite coordinate", index),
        ));
    }

    let indices: Vec<usize> = stl
        .faces
        .iter()
        .flat_map(|face| face.vertices)
        .collect();

    debug!(
        ?encoding,
        triangles = stl.faces.len(),
        unique_vertices = positions.len(),
        "parsed STL"
    );

    Ok(ParsedModel {
        root: SceneNode::mesh("solid", Geometry::indexed(positions, indices)),
        hints,
    })
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn declared_binary_len(bytes: &[u8]) -> Option<u64> {
    let count = bytes.get(HEADER_LEN..PREAMBLE_LEN)?;
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as u64;
    Some(PREAMBLE_LEN as u64 + count * TRIANGLE_RECORD_LEN)
}

/// Reject binary payloads too short for the triangles their header
/// declares, naming the offset where the data runs out.
fn validate_binary_len(bytes: &[u8]) -> Result<()> {
    let actual = bytes.len() as u64;
    let expected = declared_binary_len(bytes).ok_or_else(|| {
        PartDiffError::parse(
            FORMAT,
            Some(Location::Offset(actual)),
            format!(
                "binary STL needs an {}-byte preamble, payload has {} bytes",
                PREAMBLE_LEN, actual
            ),
        )
    })?;

    if actual < expected {
        let declared = (expected - PREAMBLE_LEN as u64) / TRIANGLE_RECORD_LEN;
        return Err(PartDiffError::parse(
            FORMAT,
            Some(Location::Offset(actual)),
            format!(
                "truncated binary STL: header declares {} triangles ({} bytes), payload ends early",
                declared, expected
            ),
        ));
    }
    Ok(())
}

/// A `solid` payload that is not text is either a binary file cut short
/// or garbage; locate the failure either way.
fn check_ascii_text(bytes: &[u8]) -> Result<()> {
    let Err(e) = std::str::from_utf8(bytes) else {
        return Ok(());
    };

    match declared_binary_len(bytes) {
        Some(expected) if expected > bytes.len() as u64 => validate_binary_len(bytes),
        _ => Err(PartDiffError::parse(
            FORMAT,
            Some(Location::Offset(e.valid_up_to() as u64)),
            "ASCII STL contains invalid UTF-8",
        )),
    }
}

/// `COLOR=` followed by RGBA bytes in the 80-byte header, as written by
/// Materialise and VisCAM.
fn header_hints(header: &[u8]) -> Option<MaterialHints> {
    let start = header
        .windows(COLOR_MARKER.len())
        .position(|window| window == COLOR_MARKER)?
        + COLOR_MARKER.len();
    let rgba = header.get(start..start + 4)?;

    Some(MaterialHints {
        color: Some(Rgb::new(rgba[0], rgba[1], rgba[2])),
        ..MaterialHints::default()
    })
}
