// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - format detection, parsing and importing

mod format;
mod importer;
mod mtl;
mod obj;
mod statements;
mod stl;

pub use format::{parse, parse_with_library, MeshFormat, MeshParser, ParsedModel};
pub use importer::{import_model_file, read_payload};
pub use mtl::parse_mtl;
pub use obj::parse_obj;
pub use stl::{detect_encoding, parse_stl, StlEncoding};

#[cfg(test)]
pub(crate) use stl::tests::binary_stl;
