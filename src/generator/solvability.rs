/*
solvability.rs

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

//! Replay the task queue against the stands, exactly as gameplay would.
//!
//! A task is satisfied only by bricks of its color taken from the top of a
//! stand. Bricks are always popped from the lowest-indexed stand whose top
//! matches. The task batch builder re-checks every stacking candidate with
//! [`verify`] before emitting it, so generated levels replay cleanly here.

use log::debug;

use super::accessibility::Reachability;
use crate::level::{BrickColor, Stand, Task};

/// Outcome of replaying a task list against a stand layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvabilityReport {
    /// Whether every task (and, when required, every brick) was consumed.
    pub solvable: bool,

    /// Index of the first task that could not be completed.
    pub failed_task: Option<usize>,

    /// Color of the failed task.
    pub failed_color: Option<BrickColor>,

    /// How many bricks of the failed color were reachable within the window
    /// when the task got stuck.
    pub reachable: usize,

    /// How many bricks the failed task still needed.
    pub required: usize,

    /// Bricks left on the stands after the replay.
    pub leftover: usize,

    /// Human-readable diagnostic for editor tooling.
    pub message: String,
}

impl SolvabilityReport {
    fn solved(leftover: usize) -> Self {
        Self {
            solvable: true,
            failed_task: None,
            failed_color: None,
            reachable: 0,
            required: 0,
            leftover,
            message: String::from("All tasks completed"),
        }
    }
}

/// Pop up to `required` bricks of `color` from the stand tops, always taking
/// from the lowest-indexed stand whose top matches first. Returns the number
/// of bricks actually popped.
pub fn pop_chunk(stands: &mut [Stand], color: BrickColor, required: usize) -> usize {
    let mut popped: usize = 0;
    while popped < required {
        let top_match: Option<&mut Stand> = stands
            .iter_mut()
            .find(|stand| stand.top() == Some(color));
        match top_match {
            Some(stand) => {
                stand.pop();
                popped += 1;
            }
            None => break,
        }
    }
    popped
}

/// Replay `tasks` in order against a working copy of `stands`.
///
/// The caller's stands and tasks are never modified. On the first task that
/// cannot be completed, the report carries the task index, the color, and
/// the color's reachability within `window` against the open requirement.
/// With `require_full_drain`, bricks left after the last task also fail the
/// check.
pub fn verify(
    stands: &[Stand],
    tasks: &[Task],
    window: usize,
    require_full_drain: bool,
) -> SolvabilityReport {
    let mut work: Vec<Stand> = stands.to_vec();

    for (index, task) in tasks.iter().enumerate() {
        let popped: usize = pop_chunk(&mut work, task.color, task.required);
        if popped < task.required {
            let short: usize = task.required - popped;
            let reachable: usize = Reachability::measure(&work, window).count(task.color);
            debug!(
                "Task {index} ({} x {}) stuck: {short} missing, {reachable} reachable",
                task.color, task.required
            );
            return SolvabilityReport {
                solvable: false,
                failed_task: Some(index),
                failed_color: Some(task.color),
                reachable,
                required: short,
                leftover: work.iter().map(Stand::len).sum(),
                message: format!(
                    "Task {} needs {} more {} bricks but only {} are reachable \
                     within the top {} positions",
                    index + 1,
                    short,
                    task.color,
                    reachable,
                    window
                ),
            };
        }
    }

    let leftover: usize = work.iter().map(Stand::len).sum();
    if require_full_drain && leftover > 0 {
        return SolvabilityReport {
            solvable: false,
            failed_task: None,
            failed_color: None,
            reachable: 0,
            required: 0,
            leftover,
            message: format!("{leftover} bricks remain stranded after the last task"),
        };
    }
    SolvabilityReport::solved(leftover)
}
