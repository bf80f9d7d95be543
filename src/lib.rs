/*
lib.rs

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

//! Procedural level generation for BrickDash.
//!
//! A BrickDash level is a row of brick stands and an ordered queue of
//! color-collection tasks. Only the brick on top of a stand can be taken, so
//! the generator must stack the bricks in a way that lets the task queue
//! drain every stand. [`generator::generate`] builds such a level from a
//! difficulty, a rough brick total, and an optional seed;
//! [`generator::validate`] re-checks an existing level, including hand-edited
//! ones.

pub mod cli_options;
pub mod generator;
pub mod level;

pub use generator::{generate, validate, GenerationError};
pub use level::{
    BrickColor, Difficulty, GenerationResult, GeneratorConfig, Stand, Task,
};
