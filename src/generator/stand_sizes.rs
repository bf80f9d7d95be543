/*
stand_sizes.rs

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

//! Turn a total brick count into per-stand brick counts.

use log::debug;

use crate::level::GeneratorConfig;

/// Per-stand brick counts and the total they actually sum to.
///
/// The adjusted total must be re-propagated to quota and task generation so
/// stand and task totals remain equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Requested total after rounding down to a chunk multiple and clamping
    /// to the maximum stand capacity.
    pub adjusted_total: usize,

    /// Brick count for each stand.
    pub sizes: Vec<usize>,
}

/// Round the requested total down to a multiple of the task chunk size.
pub fn normalize_total(config: &GeneratorConfig, total: usize) -> usize {
    if config.task_chunk_size == 0 {
        return total;
    }
    total - total % config.task_chunk_size
}

/// Distribute `total` bricks over stands.
///
/// The stand count starts at the smallest count that fits the capacity, is
/// clamped into the configured bounds, and grows while the average stand
/// would overflow. If even the maximum stand count cannot hold the total,
/// the total is clamped downward (and re-rounded to the chunk size); the
/// caller reads the result from [`Distribution::adjusted_total`]. Remainder
/// bricks are spread one per stand from the front.
pub fn distribute(config: &GeneratorConfig, total: usize) -> Distribution {
    let mut total: usize = normalize_total(config, total);

    let capacity: usize = config.max_bricks_per_stand.max(1);
    let mut count: usize = total
        .div_ceil(capacity)
        .clamp(config.min_stand_count, config.max_stand_count);

    while count < config.max_stand_count && total / count > capacity {
        count += 1;
    }
    while count > config.min_stand_count && total / count < config.min_bricks_per_stand {
        count -= 1;
    }

    let max_capacity: usize = count * capacity;
    if total > max_capacity {
        debug!("Clamping total {total} to the stand capacity {max_capacity}");
        total = normalize_total(config, max_capacity);
    }

    let base: usize = total / count;
    let remainder: usize = total % count;
    let sizes: Vec<usize> = (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();

    debug!("Distributed {total} bricks over {count} stands: {sizes:?}");
    Distribution {
        adjusted_total: total,
        sizes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_splits_evenly() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let d: Distribution = distribute(&config, 54);
        assert_eq!(d.adjusted_total, 54);
        assert_eq!(d.sizes, vec![9, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn total_is_rounded_down_to_the_chunk_size() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let d: Distribution = distribute(&config, 100);
        assert_eq!(d.adjusted_total, 99);
        assert_eq!(d.sizes.len(), 10);
        assert_eq!(d.sizes.iter().sum::<usize>(), 99);
        assert!(d.sizes.iter().all(|s| *s <= config.max_bricks_per_stand));
    }

    #[test]
    fn oversized_totals_are_clamped_to_capacity() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let d: Distribution = distribute(&config, 250);
        // 10 stands x 10 bricks, re-rounded down to a chunk multiple.
        assert_eq!(d.adjusted_total, 99);
        assert_eq!(d.sizes.iter().sum::<usize>(), 99);
    }

    #[test]
    fn remainder_goes_to_the_front_stands() {
        let config: GeneratorConfig = GeneratorConfig::default();
        let d: Distribution = distribute(&config, 63);
        assert_eq!(d.adjusted_total, 63);
        assert_eq!(d.sizes.len(), 7);
        assert_eq!(d.sizes, vec![9, 9, 9, 9, 9, 9, 9]);

        let d: Distribution = distribute(&config, 81);
        assert_eq!(d.sizes.iter().sum::<usize>(), 81);
        let max: usize = *d.sizes.iter().max().unwrap();
        let min: usize = *d.sizes.iter().min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn stand_count_stays_within_bounds() {
        let config: GeneratorConfig = GeneratorConfig::default();
        for total in [45, 54, 63, 72, 81, 90, 99] {
            let d: Distribution = distribute(&config, total);
            assert!(d.sizes.len() >= config.min_stand_count);
            assert!(d.sizes.len() <= config.max_stand_count);
        }
    }
}
