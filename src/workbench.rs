// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Workbench API: two part slots and their comparison

use crate::compare::{compare, ComparisonReport};
use crate::config::EngineConfig;
use crate::error::{PartDiffError, Result};
use crate::geometry::{compute_statistics, normalize, Statistics};
use crate::io::{import_model_file, MeshFormat, MeshParser, ParsedModel};
use crate::material::{MaterialInstance, MaterialUpdate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument};

/// Which of the two parts an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartSlot {
    Original,
    Modified,
}

impl PartSlot {
    pub const ALL: [PartSlot; 2] = [PartSlot::Original, PartSlot::Modified];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartSlot::Original => "original",
            PartSlot::Modified => "modified",
        }
    }
}

impl fmt::Display for PartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartSlot {
    type Err = PartDiffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(PartSlot::Original),
            "modified" => Ok(PartSlot::Modified),
            other => Err(PartDiffError::Config(format!(
                "unknown part slot {:?} (expected original or modified)",
                other
            ))),
        }
    }
}

/// State of one slot. Statistics are absent until a model has loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSnapshot {
    pub statistics: Option<Statistics>,
    pub format: Option<MeshFormat>,
    pub material: MaterialInstance,
}

impl PartSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.statistics.is_some()
    }
}

impl Default for PartSnapshot {
    fn default() -> Self {
        Self {
            statistics: None,
            format: None,
            material: MaterialInstance::create_default(),
        }
    }
}

/// Holds the original and the modified part.
///
/// Each slot sits behind its own lock: loads and edits on one slot never
/// wait on the other, and readers always see either the old or the new
/// state of a slot. Parsing runs before the lock is taken.
pub struct Workbench {
    config: EngineConfig,
    parser: MeshParser,
    original: RwLock<PartSnapshot>,
    modified: RwLock<PartSnapshot>,
}

impl Workbench {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            parser: MeshParser::from_config(&config),
            config,
            original: RwLock::new(PartSnapshot::default()),
            modified: RwLock::new(PartSnapshot::default()),
        }
    }

    /// Parse and analyze a model payload into `slot`.
    ///
    /// On error the slot keeps its previous contents. When the model
    /// carries material hints (and seeding is enabled) the slot's material
    /// is replaced by one seeded from them; otherwise it is kept.
    pub fn load_part(&self, slot: PartSlot, bytes: &[u8], format: MeshFormat) -> Result<PartSnapshot> {
        self.load_part_with_library(slot, bytes, format, None)
    }

    /// [`Workbench::load_part`] with a material library for OBJ payloads
    #[instrument(skip(self, bytes, library), fields(payload_len = bytes.len()))]
    pub fn load_part_with_library(
        &self,
        slot: PartSlot,
        bytes: &[u8],
        format: MeshFormat,
        library: Option<&[u8]>,
    ) -> Result<PartSnapshot> {
        let model = self.parser.parse_with_library(bytes, format, library)?;
        self.install(slot, format, &model)
    }

    /// Load a model file, choosing the format from its extension
    pub fn load_file(&self, slot: PartSlot, path: &Path) -> Result<PartSnapshot> {
        self.load_file_with_library(slot, path, None)
    }

    pub fn load_file_with_library(
        &self,
        slot: PartSlot,
        path: &Path,
        library: Option<&Path>,
    ) -> Result<PartSnapshot> {
        let format = MeshFormat::from_path(path)?;
        let model = import_model_file(path, library, &self.parser)?;
        info!(%slot, path = %path.display(), "loaded model file");
        self.install(slot, format, &model)
    }

    /// Apply one material edit to `slot`, returning the updated material.
    /// A rejected edit leaves the material unchanged.
    pub fn update_material(&self, slot: PartSlot, update: MaterialUpdate) -> Result<MaterialInstance> {
        let mut part = self.write(slot);
        debug!(%slot, ?update, "updating material");
        part.material.apply(update).cloned()
    }

    /// Copy of the current state of `slot`
    pub fn snapshot(&self, slot: PartSlot) -> PartSnapshot {
        self.read(slot).clone()
    }

    /// Compare the two slots. `None` until both hold statistics.
    pub fn get_comparison(&self) -> Option<ComparisonReport> {
        let original = self.snapshot(PartSlot::Original);
        let modified = self.snapshot(PartSlot::Modified);

        match compare(
            original.statistics.as_ref(),
            modified.statistics.as_ref(),
            &original.material,
            &modified.material,
        ) {
            Ok(report) => Some(report),
            Err(e) => {
                debug!("no comparison available: {}", e);
                None
            }
        }
    }

    /// Reset `slot` to an empty part with the default material
    pub fn clear(&self, slot: PartSlot) {
        *self.write(slot) = PartSnapshot::default();
    }

    fn install(&self, slot: PartSlot, format: MeshFormat, model: &ParsedModel) -> Result<PartSnapshot> {
        let normalized = normalize(&model.root)?;
        let statistics = compute_statistics(&normalized.mesh, &normalized.bounds);

        let seeded = match &model.hints {
            Some(hints) if self.config.seed_materials_from_hints && !hints.is_empty() => {
                Some(MaterialInstance::from_hints(hints))
            }
            _ => None,
        };

        let mut part = self.write(slot);
        let material = match seeded {
            Some(material) => {
                debug!(%slot, material = material.name(), "seeded material from model");
                material
            }
            None => part.material.clone(),
        };
        *part = PartSnapshot {
            statistics: Some(statistics),
            format: Some(format),
            material,
        };

        info!(
            %slot,
            %format,
            vertices = statistics.vertex_count,
            faces = statistics.face_count,
            "part loaded"
        );
        Ok(part.clone())
    }

    fn lock(&self, slot: PartSlot) -> &RwLock<PartSnapshot> {
        match slot {
            PartSlot::Original => &self.original,
            PartSlot::Modified => &self.modified,
        }
    }

    // Slot contents are replaced in a single assignment, so a poisoned
    // lock still guards a consistent value.
    fn read(&self, slot: PartSlot) -> RwLockReadGuard<'_, PartSnapshot> {
        self.lock(slot).read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, slot: PartSlot) -> RwLockWriteGuard<'_, PartSnapshot> {
        self.lock(slot).write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::binary_stl;
    use crate::material::{MaterialKey, Rgb};

    const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    fn one_triangle() -> Vec<u8> {
        binary_stl(&[0u8; 80], &[TRIANGLE])
    }

    #[test]
    fn test_workbench_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Workbench>();
    }

    #[test]
    fn test_load_single_triangle() {
        let bench = Workbench::default();
        let part = bench
            .load_part(PartSlot::Original, &one_triangle(), MeshFormat::Stl)
            .unwrap();

        let stats = part.statistics.unwrap();
        assert_eq!(stats.vertex_count, 3);
        assert_eq!(stats.face_count, 1);
        assert_eq!((stats.dimensions.x, stats.dimensions.y, stats.dimensions.z), (1.0, 1.0, 0.0));
        assert_eq!(part.format, Some(MeshFormat::Stl));
        assert!(!bench.snapshot(PartSlot::Modified).is_loaded());
    }

    #[test]
    fn test_comparison_requires_both_slots() {
        let bench = Workbench::default();
        assert!(bench.get_comparison().is_none());

        bench
            .load_part(PartSlot::Original, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        assert!(bench.get_comparison().is_none());

        bench
            .load_part(PartSlot::Modified, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        let report = bench.get_comparison().unwrap();
        assert_eq!(report.face_diff, 0.0);
        assert!(!report.material_diffs.color_changed);
    }

    #[test]
    fn test_failed_load_leaves_slot_untouched() {
        let bench = Workbench::default();
        bench
            .load_part(PartSlot::Original, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        bench
            .update_material(PartSlot::Original, MaterialUpdate::Property(MaterialKey::Density, 2.7))
            .unwrap();
        let before = bench.snapshot(PartSlot::Original);

        let err = bench
            .load_part(PartSlot::Original, b"f 1 2 3\n", MeshFormat::Obj)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteGeometry);

        let truncated = &one_triangle()[..100];
        let err = bench
            .load_part(PartSlot::Original, truncated, MeshFormat::Stl)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);

        assert_eq!(bench.snapshot(PartSlot::Original), before);
    }

    #[test]
    fn test_rejected_material_edit() {
        let bench = Workbench::default();
        let err = bench
            .update_material(PartSlot::Modified, MaterialUpdate::Property(MaterialKey::Metallic, 1.5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(bench.snapshot(PartSlot::Modified), PartSnapshot::default());
    }

    #[test]
    fn test_color_edit_shows_in_comparison() {
        let bench = Workbench::default();
        for slot in PartSlot::ALL {
            bench.load_part(slot, &one_triangle(), MeshFormat::Stl).unwrap();
        }

        let material = bench
            .update_material(PartSlot::Modified, MaterialUpdate::Color(Rgb::new(255, 0, 0)))
            .unwrap();
        assert_eq!(material.color(), Rgb::new(255, 0, 0));
        assert!(bench.get_comparison().unwrap().material_diffs.color_changed);
    }

    #[test]
    fn test_hints_seed_material_and_absent_hints_keep_it() {
        let bench = Workbench::default();
        let obj = b"mtllib part.mtl\nusemtl Steel\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mtl = b"newmtl Steel\nKd 1 0 0\nPm 0.9\n";

        let part = bench
            .load_part_with_library(PartSlot::Original, obj, MeshFormat::Obj, Some(mtl))
            .unwrap();
        assert_eq!(part.material.name(), "Steel");
        assert_eq!(part.material.color(), Rgb::new(255, 0, 0));
        assert_eq!(part.material.get(MaterialKey::Metallic), 0.9);

        // A plain STL carries no hints: the seeded material stays.
        let part = bench
            .load_part(PartSlot::Original, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        assert_eq!(part.material.name(), "Steel");
    }

    #[test]
    fn test_seeding_can_be_disabled() {
        let bench = Workbench::new(EngineConfig {
            seed_materials_from_hints: false,
            ..EngineConfig::default()
        });
        let obj = b"usemtl Steel\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let part = bench.load_part(PartSlot::Modified, obj, MeshFormat::Obj).unwrap();
        assert_eq!(part.material, MaterialInstance::create_default());
    }

    #[test]
    fn test_clear() {
        let bench = Workbench::default();
        bench
            .load_part(PartSlot::Modified, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        bench.clear(PartSlot::Modified);
        assert_eq!(bench.snapshot(PartSlot::Modified), PartSnapshot::default());
    }

    #[test]
    fn test_concurrent_readers_see_whole_slots() {
        let bench = Workbench::default();
        bench
            .load_part(PartSlot::Original, &one_triangle(), MeshFormat::Stl)
            .unwrap();
        let two = binary_stl(&[0u8; 80], &[TRIANGLE, TRIANGLE]);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..50 {
                    bench.load_part(PartSlot::Modified, &two, MeshFormat::Stl).unwrap();
                    bench
                        .load_part(PartSlot::Modified, &one_triangle(), MeshFormat::Stl)
                        .unwrap();
                }
            });
            scope.spawn(|| {
                for _ in 0..50 {
                    if let Some(report) = bench.get_comparison() {
                        assert!(report.face_diff == 0.0 || report.face_diff == 100.0);
                        assert_eq!(report.vertex_diff, report.face_diff);
                    }
                }
            });
        });
    }

    #[test]
    fn test_slot_names() {
        assert_eq!("Original".parse::<PartSlot>().unwrap(), PartSlot::Original);
        assert_eq!(PartSlot::Modified.to_string(), "modified");
        assert!("third".parse::<PartSlot>().is_err());
    }
}
