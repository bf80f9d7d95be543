/*
accessibility.rs

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

//! Measure which colors are reachable near the tops of the stands.
//!
//! The reachability window is the number of bricks from the top of each
//! stand a player can obtain without fully draining it. Failed solvability
//! checks report these counts as the diagnostic; the task batch builder
//! applies the same window to its pre-stacking tallies when weighting the
//! chunk order.

use std::collections::BTreeMap;

use crate::level::{BrickColor, Stand};

/// Per-color brick counts within the top window of every stand.
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    counts: BTreeMap<BrickColor, usize>,
}

impl Reachability {
    /// Count the bricks of each color within the top `window` positions of
    /// every stand (the whole stand when it is shorter than the window).
    pub fn measure(stands: &[Stand], window: usize) -> Self {
        let mut counts: BTreeMap<BrickColor, usize> = BTreeMap::new();
        for stand in stands {
            for color in stand.top_window(window) {
                *counts.entry(*color).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Reachable brick count for the color.
    pub fn count(&self, color: BrickColor) -> usize {
        self.counts.get(&color).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::BrickColor::{Blue, Green, Red};

    fn stands() -> Vec<Stand> {
        vec![
            Stand::from_bricks(vec![Blue, Blue, Red, Green]),
            Stand::from_bricks(vec![Green, Red]),
            Stand::from_bricks(vec![Red]),
        ]
    }

    #[test]
    fn window_counts_only_the_top_bricks() {
        let reach: Reachability = Reachability::measure(&stands(), 1);
        assert_eq!(reach.count(Green), 1);
        assert_eq!(reach.count(Red), 2);
        assert_eq!(reach.count(Blue), 0);

        let reach: Reachability = Reachability::measure(&stands(), 2);
        assert_eq!(reach.count(Green), 2);
        assert_eq!(reach.count(Red), 3);
        assert_eq!(reach.count(Blue), 0);
    }

    #[test]
    fn short_stands_expose_everything() {
        let reach: Reachability = Reachability::measure(&stands(), 10);
        assert_eq!(reach.count(Blue), 2);
        assert_eq!(reach.count(Red), 3);
        assert_eq!(reach.count(Green), 2);
    }

    #[test]
    fn wider_windows_never_report_less() {
        let stands: Vec<Stand> = stands();
        for w1 in 1..6 {
            let narrow: Reachability = Reachability::measure(&stands, w1);
            let wide: Reachability = Reachability::measure(&stands, w1 + 1);
            for color in [Blue, Red, Green] {
                assert!(wide.count(color) >= narrow.count(color));
            }
        }
    }
}
