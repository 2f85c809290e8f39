// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Part comparison - percentage differences and comparison reports

mod percent;
mod report;

pub use percent::{count_diff, percent_diff};
pub use report::{
    compare, compare_at, ComparisonReport, DimensionDiff, MaterialDiffs, PartFigures,
};
