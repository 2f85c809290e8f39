// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model file importer

use super::{MeshFormat, MeshParser, ParsedModel};
use crate::error::{PartDiffError, Result};
use std::fs;
use std::path::Path;

/// Read a file after checking its size against the parser's limit, so
/// oversized files are rejected without being read.
pub fn read_payload(path: &Path, parser: &MeshParser) -> Result<Vec<u8>> {
    let io_error = |source| PartDiffError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    parser.check_size(metadata.len())?;
    fs::read(path).map_err(io_error)
}

/// Import a model file, choosing the format from its extension
pub fn import_model_file(
    path: &Path,
    library: Option<&Path>,
    parser: &MeshParser,
) -> Result<ParsedModel> {
    let format = MeshFormat::from_path(path)?;
    let bytes = read_payload(path, parser)?;
    let library = library
        .map(|library| read_payload(library, parser))
        .transpose()?;

    parser.parse_with_library(&bytes, format, library.as_deref())
}
