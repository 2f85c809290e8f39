// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Supported formats and the format-dispatching parser

use super::{obj, stl};
use crate::config::{EngineConfig, DEFAULT_MAX_PAYLOAD_BYTES};
use crate::error::{PartDiffError, Result};
use crate::geometry::SceneNode;
use crate::material::MaterialHints;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Accepted model formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    /// Triangle soup, binary or ASCII
    Stl,
    /// Wavefront OBJ indexed scene
    Obj,
}

impl MeshFormat {
    /// Format for a file extension (without the dot), case-insensitive
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "stl" => Ok(MeshFormat::Stl),
            "obj" => Ok(MeshFormat::Obj),
            _ => Err(PartDiffError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Format for a path, from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "stl",
            MeshFormat::Obj => "obj",
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for MeshFormat {
    type Err = PartDiffError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

/// Output of a parser: the scene and any embedded material information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedModel {
    pub root: SceneNode,
    pub hints: Option<MaterialHints>,
}

/// Size-limited, format-dispatching parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshParser {
    max_payload_bytes: u64,
}

impl MeshParser {
    pub fn new(max_payload_bytes: u64) -> Self {
        Self { max_payload_bytes }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_payload_bytes)
    }

    pub fn max_payload_bytes(&self) -> u64 {
        self.max_payload_bytes
    }

    /// Reject payloads over the limit before anything is decoded.
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_payload_bytes {
            return Err(PartDiffError::SizeLimitExceeded {
                size,
                limit: self.max_payload_bytes,
            });
        }
        Ok(())
    }

    pub fn parse(&self, bytes: &[u8], format: MeshFormat) -> Result<ParsedModel> {
        self.parse_with_library(bytes, format, None)
    }

    /// Parse a model together with its material library. The library is
    /// only consulted for OBJ payloads.
    pub fn parse_with_library(
        &self,
        bytes: &[u8],
        format: MeshFormat,
        library: Option<&[u8]>,
    ) -> Result<ParsedModel> {
        self.check_size(bytes.len() as u64)?;
        if let Some(library) = library {
            self.check_size(library.len() as u64)?;
        }
        if bytes.is_empty() {
            return Err(PartDiffError::parse(format, None, "empty payload"));
        }

        debug!(%format, bytes = bytes.len(), "parsing payload");

        match format {
            MeshFormat::Stl => stl::parse_stl(bytes),
            MeshFormat::Obj => obj::parse_obj(bytes, library),
        }
    }
}

impl Default for MeshParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

/// Parse with the default size limit
pub fn parse(bytes: &[u8], format: MeshFormat) -> Result<ParsedModel> {
    MeshParser::default().parse(bytes, format)
}

/// Parse an OBJ (or any format) with an optional MTL library, default limit
pub fn parse_with_library(
    bytes: &[u8],
    format: MeshFormat,
    library: Option<&[u8]>,
) -> Result<ParsedModel> {
    MeshParser::default().parse_with_library(bytes, format, library)
}
