/*
generator.rs

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

//! Level generation pipeline.
//!
//! A level is a set of brick stands plus an ordered task queue that consumes
//! every brick. One attempt runs the stages in order: pick the color pool,
//! distribute the brick total over stands, plan per-color quotas as task-chunk
//! multiples, compose each stand under the difficulty's composition rules,
//! batch the tasks, then replay the result through the solvability verifier
//! and the structural validator. Any stage can dead-end on an unlucky draw;
//! the driver retries with fresh randomness from the same seeded source, a
//! bounded number of times, and reports the last failure when the budget runs
//! out.

pub mod accessibility;
pub mod color_pool;
pub mod color_quotas;
pub mod composer;
pub mod random_source;
pub mod solvability;
pub mod stand_sizes;
pub mod task_batch;
pub mod validator;

use std::fmt;

use log::debug;

use crate::level::{
    BrickColor, Difficulty, GenerationResult, GeneratorConfig, Stand, Task,
};
use composer::StandColorComposer;
use random_source::RandomSource;
use stand_sizes::Distribution;
use task_batch::TaskBatchBuilder;
use validator::ValidationReport;

/// Type of errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request cannot produce a level under the configured bounds.
    InvalidInput {
        /// Why the request was rejected.
        message: String,
    },

    /// Every attempt dead-ended.
    Exhausted {
        /// Number of attempts made.
        attempts: usize,

        /// Diagnostic from the last failed attempt.
        last_failure: String,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "invalid request: {message}"),
            Self::Exhausted {
                attempts,
                last_failure,
            } => write!(
                f,
                "generation gave up after {attempts} attempts (last failure: {last_failure})"
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Generate a solvable level of roughly `total` bricks.
///
/// The total is rounded to a multiple of the task chunk size and clamped to
/// what the stand bounds can hold; the actual figure comes back in the
/// result's `adjusted_total`. The same `seed` always yields the same level.
///
/// # Errors
///
/// [`GenerationError::InvalidInput`] when the request can never fit the
/// configured bounds, [`GenerationError::Exhausted`] when every attempt
/// dead-ended.
pub fn generate(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    total: usize,
    seed: Option<u64>,
) -> Result<GenerationResult, GenerationError> {
    check_request(config, total)?;

    let mut rng: RandomSource = RandomSource::new(seed);
    let mut last_failure: String = String::from("no attempt recorded");

    for attempt in 1..=config.max_attempts {
        match attempt_once(config, difficulty, total, &mut rng) {
            Ok(mut result) => {
                result.attempts = attempt;
                debug!(
                    "Generated {} bricks over {} stands on attempt {attempt}",
                    result.adjusted_total,
                    result.stands.len()
                );
                return Ok(result);
            }
            Err(failure) => {
                debug!("Attempt {attempt} failed: {failure}");
                last_failure = failure;
            }
        }
    }

    Err(GenerationError::Exhausted {
        attempts: config.max_attempts,
        last_failure,
    })
}

/// Run the full structural and solvability checks on an existing level, for
/// editor tooling and for the generator's own post-check.
pub fn validate(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    stands: &[Stand],
    tasks: &[Task],
    expected_total: usize,
) -> ValidationReport {
    let report: ValidationReport =
        validator::validate_structure(config, difficulty, stands, tasks, expected_total);
    if !report.success {
        return report;
    }

    let profile = difficulty.profile();
    let replay = solvability::verify(stands, tasks, profile.window, config.require_full_drain);
    if !replay.solvable {
        return ValidationReport {
            success: false,
            stand_index: None,
            message: replay.message,
        };
    }
    report
}

/// Reject requests that no amount of retrying can satisfy.
fn check_request(config: &GeneratorConfig, total: usize) -> Result<(), GenerationError> {
    if config.palette.is_empty() {
        return Err(GenerationError::InvalidInput {
            message: String::from("the color palette is empty"),
        });
    }
    if total == 0 {
        return Err(GenerationError::InvalidInput {
            message: String::from("the brick total must be positive"),
        });
    }

    let rounded: usize = stand_sizes::normalize_total(config, total);
    let floor: usize = config.min_stand_count * config.min_bricks_per_stand;
    if rounded < floor {
        return Err(GenerationError::InvalidInput {
            message: format!(
                "{total} bricks round to {rounded}, below the {floor} needed to \
                 fill {} stands of at least {} bricks",
                config.min_stand_count, config.min_bricks_per_stand
            ),
        });
    }
    Ok(())
}

/// One pass through the pipeline. Errors are stage diagnostics for the retry
/// loop, already formatted.
fn attempt_once(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    total: usize,
    rng: &mut RandomSource,
) -> Result<GenerationResult, String> {
    let distribution: Distribution = stand_sizes::distribute(config, total);
    let pool: Vec<BrickColor> = color_pool::select(config, difficulty, None, rng);
    let quotas: Vec<(BrickColor, usize)> = color_quotas::plan(
        difficulty,
        distribution.adjusted_total,
        &pool,
        config.task_chunk_size,
    );

    let composer: StandColorComposer = StandColorComposer::new(difficulty);
    let layouts: Vec<Stand> = composer
        .compose(&distribution.sizes, &quotas, rng)
        .map_err(|e| format!("composition failed: {e:?}"))?;

    let builder: TaskBatchBuilder = TaskBatchBuilder::new(
        difficulty,
        config.task_chunk_size,
        config.require_full_drain,
    );
    let (stands, tasks): (Vec<Stand>, Vec<Task>) = builder
        .build(&layouts, rng)
        .map_err(|failure| format!("stacking failed: {failure}"))?;

    let profile = difficulty.profile();
    let replay = solvability::verify(&stands, &tasks, profile.window, config.require_full_drain);
    if !replay.solvable {
        return Err(format!("solvability check failed: {}", replay.message));
    }

    let report: ValidationReport = validator::validate_structure(
        config,
        difficulty,
        &stands,
        &tasks,
        distribution.adjusted_total,
    );
    if !report.success {
        return Err(format!("structural check failed: {}", report.message));
    }

    Ok(GenerationResult {
        stands,
        tasks,
        adjusted_total: distribution.adjusted_total,
        attempts: 0,
    })
}
