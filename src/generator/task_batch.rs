/*
task_batch.rs

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

//! Order the task queue and stack the stands so the queue replays cleanly.
//!
//! The composer fixes how many bricks of each color a stand holds; this
//! builder decides the rest: the order of the task chunks and the vertical
//! arrangement of every stand. The chunk order is a weighted draw: colors
//! spread widely enough to meet the difficulty's reachability target carry
//! the profile's priority weight, the rest draw at the base weight, and the
//! spread estimate is refreshed as earlier chunks claim their bricks. The
//! builder then walks the task queue front to back and
//! assigns each chunk's bricks to supplying stands, filling the stands from
//! the top down, so a brick is only ever covered by bricks of earlier tasks.
//! How a chunk spreads over the stands follows the difficulty: easy levels
//! keep a chunk on few stands (long same-color runs), hard levels scatter it
//! brick by brick.
//!
//! Same-color runs can still merge across task boundaries within a stand, and
//! the canonical replay may then consume a later task's bricks early. Every
//! candidate is therefore re-checked with the verifier and rebuilt with fresh
//! randomness when the replay fails.

use log::debug;
use std::collections::BTreeMap;
use std::fmt;

use super::random_source::RandomSource;
use super::solvability::{self, SolvabilityReport};
use crate::level::{BrickColor, Difficulty, DifficultyProfile, Stand, Task};

// Rebuild attempts before the builder gives up on a layout.
const MAX_RESTARTS: usize = 24;

/// Diagnostic for a layout no rebuild could make replayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Color of the task the last replay got stuck on, if it got that far.
    pub color: Option<BrickColor>,

    /// Bricks of that color reachable within the window when it got stuck.
    pub reachable: usize,

    /// Bricks the stuck task still needed.
    pub required: usize,

    /// Verifier diagnostic from the last attempt.
    pub message: String,
}

impl BatchFailure {
    fn from_report(report: SolvabilityReport) -> Self {
        Self {
            color: report.failed_color,
            reachable: report.reachable,
            required: report.required,
            message: report.message,
        }
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Turn per-stand color counts into a stacked level and its task queue.
pub struct TaskBatchBuilder {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    chunk: usize,
    require_full_drain: bool,
}

impl TaskBatchBuilder {
    /// Create the builder for one difficulty and task chunk size.
    /// `require_full_drain` carries the caller's leftover policy into the
    /// builder's own replay checks.
    pub fn new(difficulty: Difficulty, chunk: usize, require_full_drain: bool) -> Self {
        Self {
            difficulty,
            profile: difficulty.profile(),
            chunk: chunk.max(1),
            require_full_drain,
        }
    }

    /// Build the final stand stacking and the task queue from the composed
    /// layouts. Only the per-stand color counts of `layouts` matter; the
    /// brick order inside each returned stand is decided here.
    ///
    /// # Errors
    ///
    /// [`BatchFailure`] with the verifier's diagnostic when every rebuild
    /// produced a replay failure. The caller retries with a re-composed
    /// layout.
    pub fn build(
        &self,
        layouts: &[Stand],
        rng: &mut RandomSource,
    ) -> Result<(Vec<Stand>, Vec<Task>), BatchFailure> {
        let mut last: Option<SolvabilityReport> = None;

        for restart in 0..MAX_RESTARTS {
            let (stands, tasks) = self.stack(layouts, rng);
            let report: SolvabilityReport = solvability::verify(
                &stands,
                &tasks,
                self.profile.window,
                self.require_full_drain,
            );
            if report.solvable {
                if restart > 0 {
                    debug!("Stacking succeeded after {restart} rebuilds");
                }
                return Ok((stands, tasks));
            }
            debug!("Rebuild {restart}: {}", report.message);
            last = Some(report);
        }

        Err(BatchFailure::from_report(last.unwrap_or_else(|| {
            solvability::verify(layouts, &[], self.profile.window, self.require_full_drain)
        })))
    }

    /// One stacking candidate: draw the chunk order, then assign each
    /// chunk's bricks to stands, top down.
    fn stack(&self, layouts: &[Stand], rng: &mut RandomSource) -> (Vec<Stand>, Vec<Task>) {
        let mut remaining: Vec<BTreeMap<BrickColor, usize>> =
            layouts.iter().map(Stand::tally).collect();
        // Brick lists built top-first, reversed into bottom-to-top stands at
        // the end.
        let mut columns: Vec<Vec<BrickColor>> =
            layouts.iter().map(|s| Vec::with_capacity(s.len())).collect();

        let order: Vec<BrickColor> = self.order_chunks(&remaining, rng);

        let mut tasks: Vec<Task> = Vec::with_capacity(order.len());
        for color in order {
            self.place_chunk(color, &mut remaining, &mut columns, rng);
            tasks.push(Task {
                color,
                required: self.chunk,
            });
        }

        // Bricks beyond the last whole chunk of a color are never scheduled;
        // they sink to the stand bottoms and the verifier reports them as
        // stranded. The quota planner keeps this path empty for generated
        // levels.
        for (stand, tally) in remaining.iter().enumerate() {
            for (color, count) in tally {
                for _ in 0..*count {
                    columns[stand].push(*color);
                }
            }
        }

        let stands: Vec<Stand> = columns
            .into_iter()
            .map(|mut column| {
                column.reverse();
                Stand::from_bricks(column)
            })
            .collect();
        (stands, tasks)
    }

    /// Draw the task order one chunk at a time: one chunk per `chunk` bricks
    /// of every color, bricks beyond the last whole chunk never scheduled.
    /// Colors whose spread meets the difficulty's reachability target draw at
    /// the profile's priority weight; the spread estimate is refreshed as
    /// each drawn chunk claims its bricks.
    fn order_chunks(
        &self,
        remaining: &[BTreeMap<BrickColor, usize>],
        rng: &mut RandomSource,
    ) -> Vec<BrickColor> {
        let mut totals: BTreeMap<BrickColor, usize> = BTreeMap::new();
        for tally in remaining {
            for (color, count) in tally {
                *totals.entry(*color).or_insert(0) += count;
            }
        }
        let mut pending: Vec<(BrickColor, usize)> = totals
            .into_iter()
            .map(|(color, total)| (color, total / self.chunk))
            .filter(|(_, chunks)| *chunks > 0)
            .collect();

        let mut tallies: Vec<BTreeMap<BrickColor, usize>> = remaining.to_vec();
        let target: usize = (self.chunk as f64 * self.profile.reach_ratio).ceil() as usize;

        let mut order: Vec<BrickColor> = Vec::new();
        while !pending.is_empty() {
            let weights: Vec<f64> = pending
                .iter()
                .map(|(color, _)| {
                    if reachable_estimate(&tallies, *color, self.profile.window) >= target {
                        self.profile.priority_weight
                    } else {
                        1.0
                    }
                })
                .collect();
            let pick: usize = weighted_pick(&weights, rng);
            let (color, chunks) = pending[pick];
            order.push(color);
            if chunks == 1 {
                pending.remove(pick);
            } else {
                pending[pick].1 = chunks - 1;
            }
            self.claim_chunk(color, &mut tallies);
        }
        order
    }

    /// Reserve one chunk's bricks for the spread estimate, deepest piles
    /// first.
    fn claim_chunk(&self, color: BrickColor, tallies: &mut [BTreeMap<BrickColor, usize>]) {
        let mut need: usize = self.chunk;
        while need > 0 {
            let deepest: Option<usize> = (0..tallies.len())
                .filter(|i| tallies[*i].get(&color).copied().unwrap_or(0) > 0)
                .max_by_key(|i| tallies[*i].get(&color).copied().unwrap_or(0));
            let Some(stand) = deepest else { break };
            let count: usize = tallies[stand].get(&color).copied().unwrap_or(0);
            let take: usize = need.min(count);
            tallies[stand].insert(color, count - take);
            need -= take;
        }
    }

    /// Hand one chunk's bricks to supplying stands, appending them below the
    /// bricks already assigned to each stand.
    fn place_chunk(
        &self,
        color: BrickColor,
        remaining: &mut [BTreeMap<BrickColor, usize>],
        columns: &mut [Vec<BrickColor>],
        rng: &mut RandomSource,
    ) {
        let mut suppliers: Vec<usize> = (0..remaining.len())
            .filter(|s| remaining[*s].get(&color).copied().unwrap_or(0) > 0)
            .collect();
        rng.shuffle(&mut suppliers);

        // Easy drains whole stands in turn; medium caps the run a single
        // stand contributes; hard scatters single bricks round-robin.
        let per_visit: usize = match self.difficulty {
            Difficulty::Easy => self.chunk,
            Difficulty::Medium => self.chunk.div_ceil(2),
            Difficulty::Hard => 1,
        };

        let mut need: usize = self.chunk;
        let mut cursor: usize = 0;
        while need > 0 && !suppliers.is_empty() {
            let stand: usize = suppliers[cursor % suppliers.len()];
            let available: usize = remaining[stand].get(&color).copied().unwrap_or(0);
            let take: usize = need.min(available).min(per_visit);

            for _ in 0..take {
                columns[stand].push(color);
            }
            if let Some(count) = remaining[stand].get_mut(&color) {
                *count -= take;
            }
            need -= take;

            if available == take {
                suppliers.remove(cursor % suppliers.len());
            } else {
                cursor += 1;
            }
        }
        // The quota planner guarantees whole chunks per color, so the
        // suppliers always cover the need.
        debug_assert_eq!(need, 0);
    }
}

/// Bricks of `color` that can sit within the top `window` positions across
/// the stands holding them; each stand contributes at most a window's worth.
fn reachable_estimate(
    tallies: &[BTreeMap<BrickColor, usize>],
    color: BrickColor,
    window: usize,
) -> usize {
    tallies
        .iter()
        .map(|tally| tally.get(&color).copied().unwrap_or(0).min(window))
        .sum()
}

/// Index drawn from the weight distribution (uniform when all weights are
/// equal).
fn weighted_pick(weights: &[f64], rng: &mut RandomSource) -> usize {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return 0;
    }
    let mut draw: f64 = rng.next_float01() * total;
    for (index, weight) in weights.iter().enumerate() {
        if draw < *weight {
            return index;
        }
        draw -= *weight;
    }
    weights.len() - 1
}
