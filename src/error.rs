// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for loading, editing and comparing parts.
//!
//! Every failure is recoverable at the call site. A failed load never
//! touches the slot it was aimed at, and degenerate percentage math is not
//! an error at all (see [`crate::compare::percent_diff`]).

use crate::io::MeshFormat;
use crate::material::MaterialKey;
use crate::workbench::PartSlot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, PartDiffError>;

/// Where in a payload a parse failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// 1-based line and column of a text payload.
    Line { line: usize, column: usize },
    /// Byte offset into a binary payload.
    Offset(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line { line, column } => write!(f, "line {}, column {}", line, column),
            Location::Offset(offset) => write!(f, "byte offset {}", offset),
        }
    }
}

/// Fieldless error classification for hosts that only surface the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    SizeLimitExceeded,
    ParseError,
    IncompleteGeometry,
    OutOfRange,
    IncompleteInput,
    Io,
    Config,
}

/// All errors produced by the engine.
#[derive(Debug, Error)]
pub enum PartDiffError {
    #[error("unsupported format: {extension:?} (expected stl or obj)")]
    UnsupportedFormat { extension: String },

    #[error("payload of {size} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("malformed {format} payload{}: {message}", location_suffix(.location))]
    Parse {
        format: MeshFormat,
        location: Option<Location>,
        message: String,
    },

    #[error("mesh node {node:?} is missing its {missing} attribute")]
    IncompleteGeometry { node: String, missing: &'static str },

    #[error("{key} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        key: MaterialKey,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("cannot compare: the {slot} part has no statistics loaded")]
    IncompleteInput { slot: PartSlot },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

fn location_suffix(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!(" at {}", location),
        None => String::new(),
    }
}

impl PartDiffError {
    pub(crate) fn parse(
        format: MeshFormat,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> Self {
        PartDiffError::Parse {
            format,
            location,
            message: message.into(),
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PartDiffError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            PartDiffError::SizeLimitExceeded { .. } => ErrorKind::SizeLimitExceeded,
            PartDiffError::Parse { .. } => ErrorKind::ParseError,
            PartDiffError::IncompleteGeometry { .. } => ErrorKind::IncompleteGeometry,
            PartDiffError::OutOfRange { .. } => ErrorKind::OutOfRange,
            PartDiffError::IncompleteInput { .. } => ErrorKind::IncompleteInput,
            PartDiffError::Io { .. } => ErrorKind::Io,
            PartDiffError::Config(_) => ErrorKind::Config,
        }
    }

    /// Location of a parse failure, if one was recorded.
    pub fn location(&self) -> Option<Location> {
        match self {
            PartDiffError::Parse { location, .. } => *location,
            _ => None,
        }
    }
}
