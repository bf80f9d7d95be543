/*
composer.rs

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

//! Build per-stand color layouts.
//!
//! Each stand must obey the difficulty's composition rules (distinct-color
//! count, dominance or balance) while all stands together consume exactly the
//! per-color quotas planned by [`super::color_quotas`]. The quotas leave very
//! little slack (27 bricks of one color over nine 9-brick stands must put
//! that color in every single stand), so the composer derives the structure
//! instead of searching for it. Medium and hard stands split into balanced
//! parts of two adjacent sizes; the composer allocates how many stands each
//! color appears in and deals the parts out stand by stand, always serving
//! the colors with the most appearances left. Easy stands get one dominant
//! color each; the composer plans how many stands each color dominates and
//! spreads the overflow as minor fillers on foreign stands. Ties are broken
//! randomly and a few cheap passes retry unlucky tie-breaks before the whole
//! attempt is failed back to the orchestrator.

use log::debug;

use super::random_source::RandomSource;
use crate::level::{BrickColor, Difficulty, Stand};

// Randomized tie-break passes before giving up on a quota set.
const MAX_PASSES: usize = 64;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum ComposeError {
    /// No layout satisfies both the per-stand rules and the quotas.
    NoLayout,
}

/// A stand layout as per-color counts. The vertical brick order is decided
/// later by the task batch builder.
type Layout = Vec<(BrickColor, usize)>;

/// Per-stand layout construction.
pub struct StandColorComposer {
    difficulty: Difficulty,
}

impl StandColorComposer {
    /// Create the composer for one difficulty.
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Compose one stand per entry in `sizes`, drawing exactly the planned
    /// quota of every color. Stand sizes are expected to lie within one
    /// brick of each other, as the distributor produces them. The brick
    /// order inside each returned stand is arbitrary; the task batch builder
    /// decides the final stacking.
    ///
    /// # Errors
    ///
    /// [`ComposeError::NoLayout`] if the quotas cannot be packed under the
    /// difficulty rules. Retryable with fresh randomness, though structural
    /// impossibilities fail every retry.
    pub fn compose(
        &self,
        sizes: &[usize],
        quotas: &[(BrickColor, usize)],
        rng: &mut RandomSource,
    ) -> Result<Vec<Stand>, ComposeError> {
        let colors: Vec<(BrickColor, usize)> = quotas
            .iter()
            .filter(|(_, q)| *q > 0)
            .copied()
            .collect();
        let quota_total: usize = colors.iter().map(|(_, q)| *q).sum();
        if colors.is_empty()
            || sizes.iter().any(|s| *s == 0)
            || sizes.iter().sum::<usize>() != quota_total
        {
            return Err(ComposeError::NoLayout);
        }

        for pass in 0..MAX_PASSES {
            let layouts: Option<Vec<Layout>> = match self.difficulty {
                Difficulty::Easy => easy_pass(sizes, &colors, rng),
                Difficulty::Medium => balanced_pass(sizes, &colors, 3, rng),
                Difficulty::Hard => balanced_pass(sizes, &colors, 4, rng),
            };
            if let Some(layouts) = layouts {
                if pass > 0 {
                    debug!("Composition settled after {pass} extra passes");
                }
                let mut stands: Vec<Stand> = Vec::with_capacity(layouts.len());
                for layout in layouts {
                    let mut bricks: Vec<BrickColor> = Vec::new();
                    for (color, count) in layout {
                        bricks.extend(std::iter::repeat_n(color, count));
                    }
                    rng.shuffle(&mut bricks);
                    stands.push(Stand::from_bricks(bricks));
                }
                return Ok(stands);
            }
        }
        Err(ComposeError::NoLayout)
    }
}

/// Split `len` bricks into `distinct` parts within one brick of each other,
/// largest parts first.
fn balanced_shape(len: usize, distinct: usize) -> Vec<usize> {
    let parts: usize = distinct.min(len).max(1);
    let base: usize = len / parts;
    let extra: usize = len % parts;
    (0..parts)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// One medium/hard allocation pass.
///
/// Every part across all stands has one of two adjacent sizes. A color
/// appearing in `a` stands with `b` large parts holds exactly
/// `small * a + b` bricks, so the quota fixes `b` once `a` is chosen. The
/// pass picks appearance counts that exactly cover the available parts, then
/// deals each stand to the colors with the most appearances left; a color
/// needed in every remaining stand is always served, large parts go to the
/// colors that still owe large parts.
fn balanced_pass(
    sizes: &[usize],
    colors: &[(BrickColor, usize)],
    distinct: usize,
    rng: &mut RandomSource,
) -> Option<Vec<Layout>> {
    let stand_count: usize = sizes.len();
    let shapes: Vec<Vec<usize>> = sizes
        .iter()
        .map(|l| balanced_shape(*l, distinct))
        .collect();
    if shapes.iter().any(|s| s.len() > colors.len()) {
        return None;
    }

    let small: usize = shapes.iter().flatten().copied().min()?;
    if shapes.iter().flatten().any(|p| *p > small + 1) {
        return None;
    }
    let total_parts: usize = shapes.iter().map(Vec::len).sum();
    let total_bigs: usize = shapes.iter().flatten().filter(|p| **p == small + 1).count();

    // Appearance counts: start from the most stands each quota can fill and
    // trim the largest until the counts match the available parts.
    let mut tie_order: Vec<usize> = (0..colors.len()).collect();
    rng.shuffle(&mut tie_order);

    let floors: Vec<usize> = colors
        .iter()
        .map(|(_, q)| q.div_ceil(small + 1))
        .collect();
    let mut appear: Vec<usize> = colors
        .iter()
        .map(|(_, q)| (q / small).min(stand_count))
        .collect();
    if appear.iter().zip(&floors).any(|(a, f)| a < f) {
        return None;
    }
    let mut have: usize = appear.iter().sum();
    if have < total_parts {
        return None;
    }
    while have > total_parts {
        let next: usize = tie_order
            .iter()
            .copied()
            .filter(|i| appear[*i] > floors[*i])
            .max_by_key(|i| appear[*i])?;
        appear[next] -= 1;
        have -= 1;
    }
    let mut bigs: Vec<usize> = colors
        .iter()
        .zip(&appear)
        .map(|((_, q), a)| q - small * a)
        .collect();
    if bigs.iter().zip(&appear).any(|(b, a)| b > a) {
        return None;
    }
    debug_assert_eq!(bigs.iter().sum::<usize>(), total_bigs);

    // Stands with the most large parts first; their suppliers are scarcer.
    let mut stand_order: Vec<usize> = (0..stand_count).collect();
    rng.shuffle(&mut stand_order);
    stand_order.sort_by_key(|i| {
        std::cmp::Reverse(shapes[*i].iter().filter(|p| **p == small + 1).count())
    });

    let mut layouts: Vec<Layout> = vec![Vec::new(); stand_count];
    let mut remaining: usize = stand_count;
    for &si in &stand_order {
        let wanted: usize = shapes[si].len();
        let large: usize = shapes[si].iter().filter(|p| **p == small + 1).count();

        let mut pool: Vec<usize> = (0..colors.len()).filter(|i| appear[*i] > 0).collect();
        rng.shuffle(&mut pool);
        pool.sort_by_key(|i| std::cmp::Reverse(appear[*i]));
        if pool.len() < wanted {
            return None;
        }

        // Colors needed in every remaining stand go in unconditionally.
        let mut chosen: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|i| appear[*i] == remaining)
            .collect();
        if chosen.len() > wanted {
            return None;
        }
        for &ci in &pool {
            if chosen.len() == wanted {
                break;
            }
            if !chosen.contains(&ci) {
                chosen.push(ci);
            }
        }

        // The large parts need suppliers with large-part debt left, and a
        // color out of small-part debt must take a large part wherever it
        // appears.
        for _ in 0..colors.len() {
            let suppliers: usize = chosen.iter().filter(|i| bigs[**i] > 0).count();
            if suppliers >= large {
                break;
            }
            let inn: usize = pool
                .iter()
                .copied()
                .find(|i| !chosen.contains(i) && bigs[*i] > 0)?;
            let out: usize = chosen
                .iter()
                .rposition(|i| bigs[*i] == 0 && appear[*i] < remaining)?;
            chosen[out] = inn;
        }
        for _ in 0..colors.len() {
            let must: usize = chosen.iter().filter(|i| bigs[**i] == appear[**i]).count();
            if must <= large {
                break;
            }
            let inn: usize = pool
                .iter()
                .copied()
                .find(|i| !chosen.contains(i) && bigs[*i] < appear[*i])?;
            let out: usize = chosen
                .iter()
                .rposition(|i| bigs[*i] == appear[*i] && appear[*i] < remaining)?;
            chosen[out] = inn;
        }
        if chosen.iter().filter(|i| bigs[**i] > 0).count() < large
            || chosen.iter().filter(|i| bigs[**i] == appear[**i]).count() > large
        {
            return None;
        }

        chosen.sort_by_key(|i| {
            (
                std::cmp::Reverse(usize::from(bigs[*i] == appear[*i])),
                std::cmp::Reverse(bigs[*i]),
            )
        });
        for (rank, &ci) in chosen.iter().enumerate() {
            if rank < large {
                if bigs[ci] == 0 {
                    return None;
                }
                bigs[ci] -= 1;
                layouts[si].push((colors[ci].0, small + 1));
            } else {
                if bigs[ci] == appear[ci] {
                    return None;
                }
                layouts[si].push((colors[ci].0, small));
            }
            appear[ci] -= 1;
        }
        remaining -= 1;
        if appear.iter().any(|a| *a > remaining) {
            return None;
        }
    }
    if appear.iter().any(|a| *a > 0) {
        return None;
    }
    Some(layouts)
}

/// Smallest count the dominant color of a stand may hold.
fn dominant_floor(len: usize) -> usize {
    (3 * len).div_ceil(5)
}

/// Largest count the dominant color may hold: one brick stays free for a
/// minor color, except on stands too short to share.
fn dominant_cap(len: usize) -> usize {
    if len < 2 { len } else { len - 1 }
}

/// One easy allocation pass.
///
/// Each stand gets a dominant color holding at least the 60% floor; quota
/// beyond what a color's own stands hold is spread as minor fillers on
/// foreign stands, two filler colors per stand at most. The pass plans how
/// many stands each color dominates (proportional to its quota), sizes the
/// dominant counts, lowers them where the fillers would not fit, and then
/// places the fillers tightest-fit first.
fn easy_pass(
    sizes: &[usize],
    quota_list: &[(BrickColor, usize)],
    rng: &mut RandomSource,
) -> Option<Vec<Layout>> {
    let stand_count: usize = sizes.len();
    let total: usize = sizes.iter().sum();

    let mut colors: Vec<(BrickColor, usize)> = quota_list.to_vec();
    rng.shuffle(&mut colors);
    colors.sort_by_key(|(_, q)| std::cmp::Reverse(*q));

    // Dominated-stand counts, proportional with largest remainders. The
    // front stands are the larger ones, so the big quotas get them.
    let mut share: Vec<usize> = colors
        .iter()
        .map(|(_, q)| stand_count * q / total)
        .collect();
    let mut leftovers: Vec<usize> = (0..colors.len()).collect();
    leftovers.sort_by_key(|i| std::cmp::Reverse(stand_count * colors[*i].1 % total));
    let mut missing: usize = stand_count - share.iter().sum::<usize>();
    let mut cursor: usize = 0;
    while missing > 0 {
        share[leftovers[cursor % leftovers.len()]] += 1;
        cursor += 1;
        missing -= 1;
    }

    // A color cannot dominate more stands than its quota fills to the 60%
    // floor; hand such stands to the most oversubscribed color.
    for _ in 0..stand_count {
        let owner: Vec<usize> = owners(&share);
        let needy: Option<usize> = (0..colors.len()).find(|j| {
            share[*j] > 0 && colors[*j].1 < owned_sum(sizes, &owner, *j, dominant_floor)
        });
        let Some(j) = needy else { break };
        share[j] -= 1;
        let recipient: usize = (0..colors.len())
            .filter(|m| *m != j)
            .max_by_key(|m| {
                colors[*m].1 as isize - owned_sum(sizes, &owner, *m, dominant_cap) as isize
            })?;
        share[recipient] += 1;
    }

    // Dominant counts: start at the cap, trim a color's own stands down to
    // its quota where the quota is the binding side.
    let owner: Vec<usize> = owners(&share);
    let mut dominant: Vec<usize> = sizes.iter().map(|l| dominant_cap(*l)).collect();
    for j in 0..colors.len() {
        let mut held: usize = owned_stands(&owner, j).map(|i| dominant[i]).sum();
        while held > colors[j].1 {
            let i: usize = owned_stands(&owner, j)
                .filter(|i| dominant[*i] > dominant_floor(sizes[*i]))
                .max_by_key(|i| dominant[*i] - dominant_floor(sizes[*i]))?;
            dominant[i] -= 1;
            held -= 1;
        }
    }

    // Filler overflow can only land on foreign stands. Where a color's
    // overflow exceeds the foreign slots, free one more slot on a foreign
    // stand whose owner can still place its own overflow.
    for _ in 0..total {
        let fillers: Vec<usize> = filler_amounts(&colors, &owner, &dominant);
        let spaces: Vec<usize> = sizes.iter().zip(&dominant).map(|(l, d)| l - d).collect();
        let total_space: usize = spaces.iter().sum();
        let own_space =
            |j: usize| -> usize { owned_stands(&owner, j).map(|i| spaces[i]).sum() };

        let deficit: Option<usize> =
            (0..colors.len()).find(|j| fillers[*j] > total_space - own_space(*j));
        let Some(j) = deficit else { break };
        let candidate: usize = (0..stand_count)
            .filter(|i| {
                let m: usize = owner[*i];
                m != j
                    && dominant[*i] > dominant_floor(sizes[*i])
                    && fillers[m] + 1 <= total_space - own_space(m)
            })
            .max_by_key(|i| dominant[*i] - dominant_floor(sizes[*i]))?;
        dominant[candidate] -= 1;
    }

    // Place the fillers, tightest slack first so exact fits are not stolen.
    // Stands owned by another filler-carrying color come first: their owner
    // cannot use them, so leaving them for last strands that owner's bricks.
    let fillers: Vec<usize> = filler_amounts(&colors, &owner, &dominant);
    let mut space: Vec<usize> = sizes.iter().zip(&dominant).map(|(l, d)| l - d).collect();
    let total_space: usize = space.iter().sum();

    let mut fill_order: Vec<usize> = (0..colors.len()).filter(|j| fillers[*j] > 0).collect();
    fill_order.sort_by_key(|j| {
        let own: usize = owned_stands(&owner, *j).map(|i| space[i]).sum();
        (total_space - own) as isize - fillers[*j] as isize
    });

    let mut stand_priority: Vec<usize> = (0..stand_count).collect();
    stand_priority.sort_by_key(|i| (usize::from(fillers[owner[*i]] == 0), *i));

    let mut extra: Vec<Vec<(usize, usize)>> = vec![Vec::new(); stand_count];
    for j in fill_order {
        let mut left: usize = fillers[j];
        for &i in &stand_priority {
            if owner[i] == j || space[i] == 0 {
                continue;
            }
            let slot: Option<usize> = extra[i].iter().position(|(c, _)| *c == j);
            if slot.is_none() && extra[i].len() == 2 {
                continue;
            }
            let take: usize = left.min(space[i]);
            match slot {
                Some(p) => extra[i][p].1 += take,
                None => extra[i].push((j, take)),
            }
            space[i] -= take;
            left -= take;
            if left == 0 {
                break;
            }
        }
        if left > 0 {
            return None;
        }
    }

    let mut layouts: Vec<Layout> = Vec::with_capacity(stand_count);
    for i in 0..stand_count {
        let mut layout: Layout = vec![(colors[owner[i]].0, dominant[i])];
        for (c, count) in &extra[i] {
            layout.push((colors[*c].0, *count));
        }
        layouts.push(layout);
    }
    Some(layouts)
}

/// Stand-to-color ownership implied by the dominated-stand counts, front to
/// back.
fn owners(share: &[usize]) -> Vec<usize> {
    let mut owner: Vec<usize> = Vec::new();
    for (j, s) in share.iter().enumerate() {
        owner.extend(std::iter::repeat_n(j, *s));
    }
    owner
}

fn owned_stands(owner: &[usize], j: usize) -> impl Iterator<Item = usize> + '_ {
    owner
        .iter()
        .enumerate()
        .filter(move |(_, o)| **o == j)
        .map(|(i, _)| i)
}

fn owned_sum(sizes: &[usize], owner: &[usize], j: usize, f: fn(usize) -> usize) -> usize {
    owned_stands(owner, j).map(|i| f(sizes[i])).sum()
}

/// Quota left over after each color's own dominant counts.
fn filler_amounts(
    colors: &[(BrickColor, usize)],
    owner: &[usize],
    dominant: &[usize],
) -> Vec<usize> {
    (0..colors.len())
        .map(|j| {
            let held: usize = owned_stands(owner, j).map(|i| dominant[i]).sum();
            colors[j].1 - held
        })
        .collect()
}
