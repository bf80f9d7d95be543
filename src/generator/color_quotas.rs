/*
color_quotas.rs

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

//! Plan how many bricks of each color the whole level uses.
//!
//! Tasks have a fixed chunk size, so each color's total across all stands
//! must be a multiple of that chunk. The planner works in whole chunk units:
//! it weights the pool by difficulty, hands out the chunks proportionally,
//! and places the remainder according to the difficulty's character. Easy
//! piles the remainder on the heaviest colors so one color clearly leads;
//! Medium and Hard hand each remaining chunk to the currently smallest
//! quota, because their per-stand composition rules cannot absorb a color
//! that dwarfs the rest on a small level. The composer later draws stand
//! layouts from these quotas.

use log::debug;
use std::cmp::Ordering;

use crate::level::{BrickColor, Difficulty};

/// Difficulty-specific color weights: Easy concentrates most bricks in the
/// first colors, Medium tilts gently toward the tail of the pool, Hard stays
/// near-uniform with a small alternating wobble.
fn weights(difficulty: Difficulty, len: usize) -> Vec<f64> {
    match difficulty {
        Difficulty::Easy => {
            let mut w: Vec<f64> = vec![0.45, 0.35, 0.2];
            w.truncate(len);
            while w.len() < len {
                w.push(*w.last().unwrap_or(&0.2));
            }
            w
        }
        Difficulty::Medium => (0..len)
            .map(|i| {
                let t: f64 = if len <= 1 {
                    1.0
                } else {
                    i as f64 / (len - 1) as f64
                };
                1.0 - 0.15 * (1.0 - t)
            })
            .collect(),
        Difficulty::Hard => (0..len)
            .map(|i| 1.0 + 0.05 * if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect(),
    }
}

/// Indexes sorted by weight, heaviest first, stable on ties.
fn weight_order(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|a, b| {
        weights[*b]
            .partial_cmp(&weights[*a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(b))
    });
    order
}

/// Allocate `total` bricks over the pool in whole `chunk` units. `total`
/// must itself be a chunk multiple. Colors that end up with a zero quota are
/// dropped from the result.
pub fn plan(
    difficulty: Difficulty,
    total: usize,
    pool: &[BrickColor],
    chunk: usize,
) -> Vec<(BrickColor, usize)> {
    if pool.is_empty() || total == 0 {
        return Vec::new();
    }

    let chunk: usize = chunk.max(1);
    let chunks_total: usize = total / chunk;
    let weights: Vec<f64> = weights(difficulty, pool.len());
    let weight_sum: f64 = weights.iter().sum::<f64>().max(0.0001);
    let order: Vec<usize> = weight_order(&weights);

    // Proportional allocation of whole chunks.
    let mut chunks: Vec<usize> = weights
        .iter()
        .map(|w| (chunks_total as f64 * (w / weight_sum)).floor() as usize)
        .collect();
    let mut remainder: usize = chunks_total - chunks.iter().sum::<usize>();

    let mut cursor: usize = 0;
    while remainder > 0 {
        let index: usize = match difficulty {
            // Pile onto the heaviest colors so a clear leader emerges.
            Difficulty::Easy => order[cursor % order.len()],
            // Lift the smallest quota; ties go to the heavier weight.
            Difficulty::Medium | Difficulty::Hard => order
                .iter()
                .copied()
                .min_by_key(|i| chunks[*i])
                .unwrap_or(0),
        };
        chunks[index] += 1;
        remainder -= 1;
        cursor += 1;
    }

    let plan: Vec<(BrickColor, usize)> = pool
        .iter()
        .zip(chunks.iter())
        .filter(|(_, c)| **c > 0)
        .map(|(color, c)| (*color, c * chunk))
        .collect();
    debug!("Color quotas for {total} bricks ({difficulty}): {plan:?}");
    plan
}
