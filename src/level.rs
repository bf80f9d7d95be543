/*
level.rs

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

//! Level data model.
//!
//! A level is a pair of lists: [`Stand`] objects (stacks of colored bricks,
//! bottom to top) and [`Task`] objects (ordered demands for bricks of one
//! color). The generator in [`crate::generator`] produces both lists so that
//! the tasks can be completed by popping bricks from the tops of the stands,
//! in task order.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::FromRepr;

/// Brick colors available to the core mechanics.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    FromRepr,
)]
#[repr(i32)]
pub enum BrickColor {
    Blue,
    Red,
    Yellow,
    Purple,
    Green,
    Pink,
    Orange,
}

impl BrickColor {
    /// Return the full palette, in declaration order.
    pub fn palette() -> Vec<BrickColor> {
        vec![
            BrickColor::Blue,
            BrickColor::Red,
            BrickColor::Yellow,
            BrickColor::Purple,
            BrickColor::Green,
            BrickColor::Pink,
            BrickColor::Orange,
        ]
    }
}

impl fmt::Display for BrickColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Level difficulty level.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(i32)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Read-only tuning bundle derived from a [`Difficulty`].
///
/// Computed on demand, never persisted.
#[derive(Debug, Copy, Clone)]
pub struct DifficultyProfile {
    /// How many bricks from the top of each stand count as reachable when
    /// ranking task colors and diagnosing failed solvability checks.
    pub window: usize,

    /// Fraction of a task chunk that should already be reachable for a color
    /// to be a preferred batching candidate.
    pub reach_ratio: f64,

    /// How strongly reachability outweighs the random tie-break when picking
    /// the next task color.
    pub priority_weight: f64,
}

impl Difficulty {
    /// Return the tuning profile for this difficulty.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                window: 5,
                reach_ratio: 0.4,
                priority_weight: 2.0,
            },
            Difficulty::Medium => DifficultyProfile {
                window: 4,
                reach_ratio: 0.5,
                priority_weight: 1.5,
            },
            Difficulty::Hard => DifficultyProfile {
                window: 3,
                reach_ratio: 0.6,
                priority_weight: 1.0,
            },
        }
    }
}

/// A stack of bricks on a stand. The top-most brick is at the end of the
/// list; only the top brick can be removed.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Stand {
    bricks: Vec<BrickColor>,
}

impl Stand {
    /// Create an empty stand.
    pub fn new() -> Self {
        Self { bricks: Vec::new() }
    }

    /// Create a stand from a bottom-to-top brick list.
    pub fn from_bricks(bricks: Vec<BrickColor>) -> Self {
        Self { bricks }
    }

    /// Add a brick on top of the stand.
    pub fn push(&mut self, color: BrickColor) {
        self.bricks.push(color);
    }

    /// Remove and return the top brick.
    pub fn pop(&mut self) -> Option<BrickColor> {
        self.bricks.pop()
    }

    /// Return the color of the top brick without removing it.
    pub fn top(&self) -> Option<BrickColor> {
        self.bricks.last().copied()
    }

    /// Get the number of bricks on the stand.
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Whether the stand holds no bricks.
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Return the brick list, bottom to top.
    pub fn bricks(&self) -> &[BrickColor] {
        &self.bricks
    }

    /// Return the top `window` bricks (all of them if the stand is shorter).
    pub fn top_window(&self, window: usize) -> &[BrickColor] {
        let start: usize = self.bricks.len().saturating_sub(window);
        &self.bricks[start..]
    }

    /// Count the bricks of each color on the stand.
    pub fn tally(&self) -> BTreeMap<BrickColor, usize> {
        let mut counts: BTreeMap<BrickColor, usize> = BTreeMap::new();
        for color in &self.bricks {
            *counts.entry(*color).or_insert(0) += 1;
        }
        counts
    }
}

/// An ordered unit of demand: `required` bricks of `color`, satisfied only by
/// bricks taken from the tops of stands.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Task {
    /// Color the task consumes.
    pub color: BrickColor,

    /// Number of bricks the task consumes. Always the configured chunk size
    /// for generated levels.
    pub required: usize,
}

/// Capacity constants and palette for one generation run.
///
/// Passed explicitly into the entry points so tests and balancing passes can
/// retune bounds without touching the algorithm.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Colors available to the level.
    pub palette: Vec<BrickColor>,

    /// Smallest number of stands a level may use.
    pub min_stand_count: usize,

    /// Largest number of stands a level may use.
    pub max_stand_count: usize,

    /// Smallest brick count the size distributor aims for per stand.
    pub min_bricks_per_stand: usize,

    /// Stand capacity.
    pub max_bricks_per_stand: usize,

    /// Fixed brick count per task.
    pub task_chunk_size: usize,

    /// Retry ceiling for the generation loop.
    pub max_attempts: usize,

    /// Whether a solvable level must drain every brick, or merely complete
    /// every task.
    pub require_full_drain: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            palette: BrickColor::palette(),
            min_stand_count: 6,
            max_stand_count: 10,
            min_bricks_per_stand: 7,
            max_bricks_per_stand: 10,
            task_chunk_size: 9,
            max_attempts: 64,
            require_full_drain: true,
        }
    }
}

/// Output of a successful generation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Stand layouts, each ordered bottom to top.
    pub stands: Vec<Stand>,

    /// Task list, consumed strictly in order.
    pub tasks: Vec<Task>,

    /// Requested total after rounding to the chunk size and clamping to the
    /// stand capacity. Equals the brick sum of `stands` and the required sum
    /// of `tasks`.
    pub adjusted_total: usize,

    /// Number of attempts the retry loop used.
    #[serde(default)]
    pub attempts: usize,
}

impl GenerationResult {
    /// Sum of all bricks placed on stands.
    pub fn stand_total(&self) -> usize {
        self.stands.iter().map(Stand::len).sum()
    }

    /// Sum of all task requirements.
    pub fn task_total(&self) -> usize {
        self.tasks.iter().map(|t| t.required).sum()
    }
}
