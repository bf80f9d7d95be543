/*
validator.rs

Copyright 2026 the BrickDash developers

This file is part of BrickDash.

BrickDash is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

BrickDash is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
BrickDash. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Structural checks on a stands/tasks pair.
//!
//! These re-check what the composer and quota planner should already
//! guarantee (total equality, capacity bounds, per-stand composition rules),
//! so a failure on generated output indicates a generator bug. Editor
//! tooling also runs them on hand-edited levels, where failures are routine
//! and must come back as values, never as panics.

use std::collections::BTreeMap;

use crate::level::{BrickColor, Difficulty, GeneratorConfig, Stand, Task};

/// Result of the structural checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether every check passed.
    pub success: bool,

    /// Index of the first offending stand, when the failure is stand-local.
    pub stand_index: Option<usize>,

    /// Human-readable reason for the first failure.
    pub message: String,
}

impl ValidationReport {
    fn ok() -> Self {
        Self {
            success: true,
            stand_index: None,
            message: String::from("Level structure is valid"),
        }
    }

    fn fail(stand_index: Option<usize>, message: String) -> Self {
        Self {
            success: false,
            stand_index,
            message,
        }
    }
}

/// Check totals, capacity bounds, and per-difficulty composition rules.
/// Returns on the first failure; never panics.
pub fn validate_structure(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    stands: &[Stand],
    tasks: &[Task],
    expected_total: usize,
) -> ValidationReport {
    let stand_total: usize = stands.iter().map(Stand::len).sum();
    let task_total: usize = tasks.iter().map(|t| t.required).sum();
    if stand_total != expected_total || task_total != expected_total {
        return ValidationReport::fail(
            None,
            format!(
                "Total mismatch: stands hold {stand_total} bricks, tasks require \
                 {task_total}, expected {expected_total}"
            ),
        );
    }

    if stands.len() < config.min_stand_count || stands.len() > config.max_stand_count {
        return ValidationReport::fail(
            None,
            format!(
                "Stand count {} is outside [{}, {}]",
                stands.len(),
                config.min_stand_count,
                config.max_stand_count
            ),
        );
    }

    for (index, stand) in stands.iter().enumerate() {
        if stand.is_empty() || stand.len() > config.max_bricks_per_stand {
            return ValidationReport::fail(
                Some(index),
                format!(
                    "Stand {} holds {} bricks, outside [1, {}]",
                    index + 1,
                    stand.len(),
                    config.max_bricks_per_stand
                ),
            );
        }
        if let Some(message) = composition_violation(difficulty, stand) {
            return ValidationReport::fail(Some(index), format!("Stand {}: {message}", index + 1));
        }
    }

    ValidationReport::ok()
}

/// Check one stand against the difficulty's composition rules. Returns a
/// description of the first violated rule, or None when the stand is fine.
fn composition_violation(difficulty: Difficulty, stand: &Stand) -> Option<String> {
    let tally: BTreeMap<BrickColor, usize> = stand.tally();
    let distinct: usize = tally.len();
    let len: usize = stand.len();
    let max: usize = tally.values().max().copied().unwrap_or(0);
    let min: usize = tally.values().min().copied().unwrap_or(0);

    match difficulty {
        Difficulty::Easy => {
            if distinct > 3 {
                return Some(format!("must use at most 3 colors, found {distinct}"));
            }
            if len >= 2 && distinct < 2 {
                return Some(String::from("must mix at least 2 colors"));
            }
            let dominant_min: usize = (3 * len).div_ceil(5);
            if max < dominant_min {
                return Some(format!(
                    "dominant color holds {max} of {len} bricks, below the 60% share"
                ));
            }
        }
        Difficulty::Medium => {
            if len >= 3 && distinct != 3 {
                return Some(format!("must use exactly 3 colors, found {distinct}"));
            }
            if max * 2 > len {
                return Some(format!(
                    "color share {max} of {len} exceeds the 50% cap"
                ));
            }
            if max - min > 1 {
                return Some(format!(
                    "color counts spread from {min} to {max}, beyond the \u{b1}1 balance"
                ));
            }
        }
        Difficulty::Hard => {
            let wanted: usize = 4.min(len);
            if distinct != wanted {
                return Some(format!("must use exactly {wanted} colors, found {distinct}"));
            }
            let cap: usize = (2 * len).div_ceil(5);
            if max > cap {
                return Some(format!(
                    "color share {max} of {len} exceeds the 40% cap ({cap})"
                ));
            }
            if max - min > 1 {
                return Some(format!(
                    "color counts spread from {min} to {max}, beyond the \u{b1}1 balance"
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::BrickColor::{Blue, Green, Purple, Red, Yellow};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            min_stand_count: 1,
            max_stand_count: 10,
            ..GeneratorConfig::default()
        }
    }

    fn tasks_for(total: usize) -> Vec<Task> {
        vec![Task {
            color: Blue,
            required: total,
        }]
    }

    #[test]
    fn accepts_a_balanced_medium_stand() {
        let stands: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Red, Yellow, Blue, Red, Yellow, Blue, Red, Yellow,
        ])];
        let report = validate_structure(&config(), Difficulty::Medium, &stands, &tasks_for(9), 9);
        assert!(report.success, "{}", report.message);
    }

    #[test]
    fn medium_rejects_a_fourth_color() {
        let stands: Vec<Stand> = vec![
            Stand::from_bricks(vec![Blue, Red, Yellow, Blue, Red, Yellow, Blue, Red, Yellow]),
            Stand::from_bricks(vec![Blue, Red, Yellow, Purple, Blue, Red, Yellow, Purple, Blue]),
        ];
        let report =
            validate_structure(&config(), Difficulty::Medium, &stands, &tasks_for(18), 18);
        assert!(!report.success);
        assert_eq!(report.stand_index, Some(1));
        assert!(report.message.contains("exactly 3 colors"), "{}", report.message);
    }

    #[test]
    fn easy_requires_a_dominant_color() {
        let dominated: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Blue, Blue, Blue, Blue, Blue, Red, Red, Red,
        ])];
        let report =
            validate_structure(&config(), Difficulty::Easy, &dominated, &tasks_for(9), 9);
        assert!(report.success, "{}", report.message);

        let split: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Blue, Blue, Blue, Blue, Red, Red, Red, Red,
        ])];
        let report = validate_structure(&config(), Difficulty::Easy, &split, &tasks_for(9), 9);
        assert!(!report.success);
        assert!(report.message.contains("60%"), "{}", report.message);
    }

    #[test]
    fn easy_rejects_a_single_color_stand() {
        let stands: Vec<Stand> = vec![Stand::from_bricks(vec![Blue; 9])];
        let report = validate_structure(&config(), Difficulty::Easy, &stands, &tasks_for(9), 9);
        assert!(!report.success);
        assert_eq!(report.stand_index, Some(0));
        assert!(report.message.contains("at least 2"), "{}", report.message);
    }

    #[test]
    fn hard_enforces_the_share_cap_and_balance() {
        let balanced: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Red, Yellow, Green, Blue, Red, Yellow, Green, Blue, Red,
        ])];
        let report =
            validate_structure(&config(), Difficulty::Hard, &balanced, &tasks_for(10), 10);
        assert!(report.success, "{}", report.message);

        let lopsided: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Blue, Blue, Blue, Blue, Red, Yellow, Green, Red, Yellow,
        ])];
        let report =
            validate_structure(&config(), Difficulty::Hard, &lopsided, &tasks_for(10), 10);
        assert!(!report.success);
    }

    #[test]
    fn totals_must_match_the_expected_count() {
        let stands: Vec<Stand> = vec![Stand::from_bricks(vec![
            Blue, Blue, Blue, Blue, Blue, Blue, Red, Red, Red,
        ])];
        let report = validate_structure(&config(), Difficulty::Easy, &stands, &tasks_for(9), 18);
        assert!(!report.success);
        assert!(report.message.contains("Total mismatch"), "{}", report.message);
        assert_eq!(report.stand_index, None);
    }

    #[test]
    fn overfull_stands_are_rejected() {
        let stands: Vec<Stand> = vec![Stand::from_bricks(vec![Blue; 11])];
        let report = validate_structure(&config(), Difficulty::Easy, &stands, &tasks_for(11), 11);
        assert!(!report.success);
        assert_eq!(report.stand_index, Some(0));
    }
}
