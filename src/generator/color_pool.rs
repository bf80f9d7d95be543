/*
color_pool.rs

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

//! Select the distinct colors that participate in a level.

use super::random_source::RandomSource;
use crate::level::{BrickColor, Difficulty, GeneratorConfig};

/// Pick the level's color pool: a subset of the palette sized by difficulty
/// (or by `size_hint` when given), unbiased across seeds because the palette
/// is shuffled before truncation. Always clamps rather than fails.
pub fn select(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    size_hint: Option<usize>,
    rng: &mut RandomSource,
) -> Vec<BrickColor> {
    if config.palette.is_empty() {
        return Vec::new();
    }

    let desired: usize = size_hint.unwrap_or(match difficulty {
        Difficulty::Easy => 3,
        Difficulty::Medium => 4,
        Difficulty::Hard => config.palette.len(),
    });
    let desired: usize = desired.clamp(1, config.palette.len());

    let mut pool: Vec<BrickColor> = config.palette.clone();
    rng.shuffle(&mut pool);
    pool.truncate(desired);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_size_follows_difficulty() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let mut rng: RandomSource = RandomSource::new(Some(1));

        assert_eq!(select(&config, Difficulty::Easy, None, &mut rng).len(), 3);
        assert_eq!(select(&config, Difficulty::Medium, None, &mut rng).len(), 4);
        assert_eq!(
            select(&config, Difficulty::Hard, None, &mut rng).len(),
            config.palette.len()
        );
    }

    #[test]
    fn size_hint_is_clamped_to_the_palette() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let mut rng: RandomSource = RandomSource::new(Some(2));

        assert_eq!(
            select(&config, Difficulty::Easy, Some(100), &mut rng).len(),
            config.palette.len()
        );
        assert_eq!(select(&config, Difficulty::Hard, Some(0), &mut rng).len(), 1);
    }

    #[test]
    fn selected_colors_are_distinct() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let mut rng: RandomSource = RandomSource::new(Some(3));

        let mut pool: Vec<BrickColor> = select(&config, Difficulty::Medium, None, &mut rng);
        pool.sort_unstable();
        pool.dedup();
        assert_eq!(pool.len(), 4);
    }
}
