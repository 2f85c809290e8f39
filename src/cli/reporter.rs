// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::compare::ComparisonReport;
use crate::material::{schema, MaterialInstance};
use crate::workbench::PartSnapshot;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the statistics and material of one loaded part
    pub fn report_stats(file: &str, part: &PartSnapshot, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Part:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        match part.statistics {
            Some(stats) => {
                Self::print_field("Vertices", &stats.vertex_count.to_string());
                Self::print_field("Faces", &stats.face_count.to_string());
                Self::print_field(
                    "Dimensions",
                    &format!(
                        "{:.4} x {:.4} x {:.4}",
                        stats.dimensions.x, stats.dimensions.y, stats.dimensions.z
                    ),
                );
                Self::print_field("Volume (bbox)", &format!("{:.4}", stats.approximate_volume()));
            }
            None => println!("  {}", "No geometry loaded".yellow()),
        }

        println!("\n{}", "Material:".bold());
        Self::print_material(&part.material);

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report a comparison with sign-aware colored percentages
    pub fn report_comparison(original: &str, modified: &str, report: &ComparisonReport) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Original:".bold(), original.cyan());
        println!("{} {}", "Modified:".bold(), modified.cyan());
        println!("{}", "━".repeat(80).bright_black());

        let (a, b) = (&report.original.statistics, &report.modified.statistics);

        println!("\n{}", "Geometry:".bold());
        Self::print_change(
            "Vertices",
            &format!("{} -> {}", a.vertex_count, b.vertex_count),
            report.vertex_diff,
        );
        Self::print_change(
            "Faces",
            &format!("{} -> {}", a.face_count, b.face_count),
            report.face_diff,
        );
        Self::print_change(
            "Width (x)",
            &format!("{:.4} -> {:.4}", a.dimensions.x, b.dimensions.x),
            report.dimension_diff.x,
        );
        Self::print_change(
            "Depth (y)",
            &format!("{:.4} -> {:.4}", a.dimensions.y, b.dimensions.y),
            report.dimension_diff.y,
        );
        Self::print_change(
            "Height (z)",
            &format!("{:.4} -> {:.4}", a.dimensions.z, b.dimensions.z),
            report.dimension_diff.z,
        );
        Self::print_change(
            "Volume (bbox)",
            &format!(
                "{:.4} -> {:.4}",
                report.original.approximate_volume, report.modified.approximate_volume
            ),
            report.volume_diff,
        );

        println!("\n{}", "Material:".bold());
        let (ma, mb) = (&report.original.material, &report.modified.material);
        Self::print_flag(
            "Name",
            &format!("{} -> {}", ma.name(), mb.name()),
            report.material_diffs.name_changed,
        );
        Self::print_flag(
            "Color",
            &format!("{} -> {}", ma.color(), mb.color()),
            report.material_diffs.color_changed,
        );
        for (key, diff) in &report.material_diffs.properties {
            let spec = key.spec();
            Self::print_change(
                spec.display_name,
                &format!("{} -> {}", ma.get(*key), mb.get(*key)),
                *diff,
            );
        }

        println!(
            "\n  {} {}",
            "Generated:".bright_black(),
            report.timestamp.to_rfc3339().bright_black()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Print the material property schema
    pub fn report_schema() {
        println!(
            "{:<24} {:<22} {:>10} {:>10} {:>10}",
            "key".bold(),
            "name".bold(),
            "default".bold(),
            "min".bold(),
            "max".bold()
        );
        for spec in schema() {
            let name = if spec.unit.is_empty() {
                spec.display_name.to_string()
            } else {
                format!("{} ({})", spec.display_name, spec.unit)
            };
            println!(
                "{:<24} {:<22} {:>10} {:>10} {:>10}",
                spec.key.as_str().cyan(),
                name,
                spec.default,
                spec.min,
                spec.max
            );
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    fn print_material(material: &MaterialInstance) {
        Self::print_field("Name", material.name());
        Self::print_field("Color", &material.color().to_string());
        for (key, value) in material.values() {
            Self::print_field(key.spec().display_name, &value.to_string());
        }
    }

    fn print_field(name: &str, value: &str) {
        println!("  {} {}", format!("{}:", name).bright_black(), value.cyan());
    }

    /// Print a figure with its percentage change, colored by sign
    fn print_change(name: &str, value: &str, diff: f64) {
        let percent = Self::format_percent(diff);
        let percent = if diff > 0.0 {
            percent.green()
        } else if diff < 0.0 {
            percent.red()
        } else {
            percent.bright_black()
        };

        println!(
            "  {} {} {}",
            format!("{}:", name).bright_black(),
            value,
            percent
        );
    }

    fn print_flag(name: &str, value: &str, changed: bool) {
        let marker = if changed {
            "changed".yellow()
        } else {
            "unchanged".bright_black()
        };
        println!(
            "  {} {} ({})",
            format!("{}:", name).bright_black(),
            value,
            marker
        );
    }

    /// Signed percentage with two decimals, e.g. `+12.50%`
    fn format_percent(diff: f64) -> String {
        if diff == 0.0 {
            "0.00%".to_string()
        } else {
            format!("{:+.2}%", diff)
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
