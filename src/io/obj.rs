// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ scene reader

use super::mtl;
use super::statements::{tokenize, Statement, Token};
use super::{MeshFormat, ParsedModel};
use crate::error::{PartDiffError, Result};
use crate::geometry::{Geometry, SceneNode};
use crate::material::MaterialHints;
use nalgebra::Point3;
use tracing::{debug, warn};

const FORMAT: MeshFormat = MeshFormat::Obj;
const DEFAULT_GROUP: &str = "default";

/// Parse an OBJ payload, optionally with the MTL library it references.
pub fn parse_obj(bytes: &[u8], library: Option<&[u8]>) -> Result<ParsedModel> {
    let statements = tokenize(bytes, FORMAT)?;
    let mut builder = SceneBuilder::default();

    for statement in &statements {
        builder.apply(statement)?;
    }

    let hints = select_hints(&builder.used_materials, library);

    debug!(
        positions = builder.positions.len(),
        faces = builder.face_statements,
        libraries = ?builder.libraries,
        has_material = hints.is_some(),
        "parsed OBJ scene"
    );

    let root = builder.finish();

    Ok(ParsedModel { root, hints })
}

/// Hints of the first used material found in the library, else the first
/// library material. Without a library, a `usemtl` name alone is kept.
/// An unreadable library yields no hints; the geometry still loads.
fn select_hints(used: &[String], library: Option<&[u8]>) -> Option<MaterialHints> {
    let Some(library) = library else {
        return used.first().map(|name| MaterialHints {
            name: Some(name.clone()),
            ..MaterialHints::default()
        });
    };

    let mut materials = match mtl::parse_mtl(library) {
        Ok(materials) => materials,
        Err(e) => {
            warn!("ignoring material library: {}", e);
            return None;
        }
    };
    if materials.is_empty() {
        return None;
    }

    let position = used
        .iter()
        .find_map(|name| materials.iter().position(|m| m.name.as_deref() == Some(name.as_str())))
        .unwrap_or(0);
    Some(materials.swap_remove(position))
}

#[derive(Default)]
struct SceneBuilder {
    positions: Vec<Point3<f64>>,
    normal_count: usize,
    texcoord_count: usize,
    face_statements: usize,
    root_children: Vec<SceneNode>,
    object: Option<(String, Vec<SceneNode>)>,
    group: Option<(String, Vec<Point3<f64>>)>,
    used_materials: Vec<String>,
    libraries: Vec<String>,
}

impl SceneBuilder {
    fn apply(&mut self, statement: &Statement<'_>) -> Result<()> {
        match statement.keyword.text {
            "v" => {
                let point = Point3::new(
                    statement.number::<f64>(FORMAT, 0)?,
                    statement.number::<f64>(FORMAT, 1)?,
                    statement.number::<f64>(FORMAT, 2)?,
                );
                if !point.iter().all(|c| c.is_finite()) {
                    return Err(PartDiffError::parse(
                        FORMAT,
                        Some(statement.location()),
                        "vertex has a non-finite coordinate",
                    ));
                }
                self.positions.push(point);
            }
            "vn" => self.normal_count += 1,
            "vt" => self.texcoord_count += 1,
            "f" => self.face(statement)?,
            "o" => {
                self.close_object();
                let name = non_empty_or(statement.rest(), "object");
                self.group = Some((name.clone(), Vec::new()));
                self.object = Some((name, Vec::new()));
            }
            "g" => {
                self.close_group();
                self.group = Some((non_empty_or(statement.rest(), DEFAULT_GROUP), Vec::new()));
            }
            "l" => self.push_other("polyline"),
            "p" => self.push_other("points"),
            "usemtl" => {
                let name = statement.rest();
                if !name.is_empty() && !self.used_materials.contains(&name) {
                    self.used_materials.push(name);
                }
            }
            "mtllib" => self.libraries.push(statement.rest()),
            // Smoothing groups and every other statement carry nothing we measure.
            _ => {}
        }
        Ok(())
    }

    fn face(&mut self, statement: &Statement<'_>) -> Result<()> {
        if self.positions.is_empty() {
            return Err(PartDiffError::IncompleteGeometry {
                node: self.current_group_name(),
                missing: "position",
            });
        }
        if statement.arguments.len() < 3 {
            return Err(PartDiffError::parse(
                FORMAT,
                Some(statement.location()),
                format!(
                    "face needs at least 3 vertices, found {}",
                    statement.arguments.len()
                ),
            ));
        }

        let corners = statement
            .arguments
            .iter()
            .map(|token| self.corner(token))
            .collect::<Result<Vec<_>>>()?;

        let name = self.current_group_name();
        let soup = &mut self.group.get_or_insert_with(|| (name, Vec::new())).1;

        // Fan triangulation around the first corner
        for window in corners[1..].windows(2) {
            soup.push(corners[0]);
            soup.push(window[0]);
            soup.push(window[1]);
        }

        self.face_statements += 1;
        Ok(())
    }

    /// Resolve `v`, `v/t`, `v//n` or `v/t/n` to an absolute position.
    fn corner(&self, token: &Token<'_>) -> Result<Point3<f64>> {
        let mut parts = token.text.split('/');

        let position = parts.next().unwrap_or_default();
        let index = resolve_index(position, self.positions.len(), "vertex", token)?;

        if let Some(texcoord) = parts.next().filter(|part| !part.is_empty()) {
            resolve_index(texcoord, self.texcoord_count, "texture coordinate", token)?;
        }
        if let Some(normal) = parts.next().filter(|part| !part.is_empty()) {
            resolve_index(normal, self.normal_count, "normal", token)?;
        }
        if parts.next().is_some() {
            return Err(PartDiffError::parse(
                FORMAT,
                Some(token.location()),
                format!("face vertex {:?} has too many components", token.text),
            ));
        }

        Ok(self.positions[index])
    }

    fn push_other(&mut self, kind: &str) {
        let name = self.current_group_name();
        self.close_group();
        self.container().push(SceneNode::other(name.clone(), kind));
        // Faces after the element continue the same group.
        self.group = Some((name, Vec::new()));
    }

    fn current_group_name(&self) -> String {
        match (&self.group, &self.object) {
            (Some((name, _)), _) => name.clone(),
            (None, Some((name, _))) => name.clone(),
            (None, None) => DEFAULT_GROUP.to_string(),
        }
    }

    fn container(&mut self) -> &mut Vec<SceneNode> {
        match &mut self.object {
            Some((_, children)) => children,
            None => &mut self.root_children,
        }
    }

    fn close_group(&mut self) {
        if let Some((name, soup)) = self.group.take() {
            if !soup.is_empty() {
                self.container().push(SceneNode::mesh(name, Geometry::soup(soup)));
            }
        }
    }

    fn close_object(&mut self) {
        self.close_group();
        if let Some((name, children)) = self.object.take() {
            self.root_children.push(SceneNode::group(name, children));
        }
    }

    fn finish(mut self) -> SceneNode {
        self.close_object();
        SceneNode::group("scene", self.root_children)
    }
}

fn non_empty_or(name: String, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// 1-based for positive values, relative to the current end of the list
/// for negative values. Zero is never valid.
fn resolve_index(text: &str, len: usize, what: &str, token: &Token<'_>) -> Result<usize> {
    let out_of_range = || {
        PartDiffError::parse(
            FORMAT,
            Some(token.location()),
            format!("{} index {} is out of range ({} defined)", what, text, len),
        )
    };

    let raw: i64 = text.parse().map_err(|_| {
        PartDiffError::parse(
            FORMAT,
            Some(token.location()),
            format!("invalid {} index {:?}", what, text),
        )
    })?;

    let resolved = match raw {
        0 => return Err(out_of_range()),
        r if r > 0 => usize::try_from(r - 1).map_err(|_| out_of_range())?,
        r => usize::try_from(len as i64 + r).map_err(|_| out_of_range())?,
    };

    if resolved < len {
        Ok(resolved)
    } else {
        Err(out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Location};
    use crate::geometry::normalize;

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = parse_obj(SQUARE.as_bytes(), None).unwrap();
        let flat = normalize(&model.root).unwrap();
        assert_eq!(flat.mesh.triangle_count(), 2);
        assert_eq!(flat.mesh.triangles[1].vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(flat.mesh.triangles[1].vertices[2], Point3::new(0.0, 1.0, 0.0));
        assert!(model.hints.is_none());
    }

    #[test]
    fn test_relative_indices_match_absolute() {
        let relative = "v 0 0 0\nv 2 0 0\nv 0 3 0\nf -3 -2 -1\n";
        let absolute = "v 0 0 0\nv 2 0 0\nv 0 3 0\nf 1 2 3\n";

        let a = normalize(&parse_obj(relative.as_bytes(), None).unwrap().root).unwrap();
        let b = normalize(&parse_obj(absolute.as_bytes(), None).unwrap().root).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_relative_index_uses_list_at_statement() {
        // -1 refers to the last vertex defined *before* the face.
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 9 9 9\n";
        let flat = normalize(&parse_obj(source.as_bytes(), None).unwrap().root).unwrap();
        assert_eq!(flat.bounds.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_groups_and_objects_build_scene() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
o bracket
g top
f 1 2 3
g bottom
f 1 3 2
l 1 2
o bolt
f 1/1/1 2/2/2 3/3/3
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1/1/1 2/2/2 3/3/3
";
        // The first face of `bolt` references texcoords before they exist.
        let err = parse_obj(source.as_bytes(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.location(), Some(Location::Line { line: 11, column: 3 }));

        let fixed = source.replacen("f 1/1/1 2/2/2 3/3/3\nvt", "f 1 2 3\nvt", 1);
        let model = parse_obj(fixed.as_bytes(), None).unwrap();
        let children = model.root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "bracket");

        let bracket: Vec<&str> = children[0].children().iter().map(|n| n.name()).collect();
        assert_eq!(bracket, vec!["top", "bottom", "bottom"]);
        assert!(matches!(children[0].children()[2], SceneNode::Other { .. }));

        assert_eq!(model.root.mesh_count(), 3);
        let flat = normalize(&model.root).unwrap();
        assert_eq!(flat.mesh.triangle_count(), 4);
    }

    #[test]
    fn test_zero_index_is_rejected_with_location() {
        let err = parse_obj(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.location(), Some(Location::Line { line: 4, column: 3 }));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let err = parse_obj(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n", None).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line { line: 4, column: 7 }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_faces_without_positions_are_incomplete() {
        let err = parse_obj(b"g lonely\nf 1 2 3\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteGeometry);
        assert!(err.to_string().contains("lonely"));
    }

    #[test]
    fn test_degenerate_face_is_rejected() {
        let err = parse_obj(b"v 0 0 0\nv 1 0 0\nf 1 2\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_empty_scene_is_valid() {
        let model = parse_obj(b"# nothing here\n", None).unwrap();
        assert_eq!(model.root.mesh_count(), 0);
        assert!(normalize(&model.root).unwrap().mesh.is_empty());
    }

    #[test]
    fn test_usemtl_without_library_keeps_name() {
        let source = format!("mtllib part.mtl\nusemtl Anodized\n{}", SQUARE);
        let model = parse_obj(source.as_bytes(), None).unwrap();
        let hints = model.hints.unwrap();
        assert_eq!(hints.name.as_deref(), Some("Anodized"));
        assert!(hints.color.is_none());
    }

    #[test]
    fn test_library_material_selected_by_usemtl() {
        let library = b"newmtl First\nKd 1 0 0\nnewmtl Second\nKd 0 0 1\nPm 0.8\n";
        let source = format!("usemtl Second\n{}", SQUARE);

        let model = parse_obj(source.as_bytes(), Some(library)).unwrap();
        let hints = model.hints.unwrap();
        assert_eq!(hints.name.as_deref(), Some("Second"));
        assert_eq!(hints.metallic, Some(0.8));

        let fallback = parse_obj(SQUARE.as_bytes(), Some(library)).unwrap();
        assert_eq!(fallback.hints.unwrap().name.as_deref(), Some("First"));
    }

    #[test]
    fn test_unreadable_library_keeps_geometry() {
        let source = format!("usemtl Broken\n{}", SQUARE);
        for library in [&b"newmtl Broken\nKd 0.5 red 0.5\n"[..], &b"newmtl \xff\n"[..]] {
            let model = parse_obj(source.as_bytes(), Some(library)).unwrap();
            assert!(model.hints.is_none());
            assert_eq!(normalize(&model.root).unwrap().mesh.triangle_count(), 2);
        }
    }
}
