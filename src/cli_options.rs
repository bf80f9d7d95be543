/*
cli_options.rs

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

//! Process command-line options.
//!
//! The command line is intended for developers building level packs. It can
//! generate a level as JSON on stdout, or re-check a level file that was
//! edited by hand.
//!
//! # Examples
//!
//! Generate a medium level of about 90 bricks, reproducibly:
//!
//! ```text
//! $ brickdash --total 90 --difficulty medium --seed 7 > level.json
//! ```
//!
//! Re-check the file after editing it:
//!
//! ```text
//! $ brickdash --check level.json --difficulty medium
//! Stand 4: must use exactly 3 colors, found 4
//! ```

use clap::Parser;
use log::debug;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::generator;
use crate::generator::validator::ValidationReport;
use crate::level::{Difficulty, GenerationResult, GeneratorConfig};

/// Generate and check BrickDash levels.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Rough number of bricks in the level
    #[arg(short, long, default_value_t = 90, conflicts_with = "check")]
    total: usize,

    /// Difficulty level
    #[arg(value_enum, short = 'f', long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Seed for reproducible generation
    #[arg(short, long, conflicts_with = "check")]
    seed: Option<u64>,

    /// Check a level file instead of generating one
    #[arg(short, long, value_name = "FILE")]
    check: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse and process command-line options. Returns the process exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let config: GeneratorConfig = GeneratorConfig::default();
    match args.check {
        Some(path) => check(&config, args.difficulty, &path),
        None => generate(&config, args.difficulty, args.total, args.seed),
    }
}

/// Generate a level and print it as JSON on stdout.
fn generate(
    config: &GeneratorConfig,
    difficulty: Difficulty,
    total: usize,
    seed: Option<u64>,
) -> u8 {
    match generator::generate(config, difficulty, total, seed) {
        Ok(result) => {
            debug!(
                "{} bricks over {} stands, {} tasks, {} attempts",
                result.adjusted_total,
                result.stands.len(),
                result.tasks.len(),
                result.attempts
            );
            match serde_json::to_string_pretty(&result) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(error) => {
                    eprintln!("Cannot serialize the level: {error}");
                    1
                }
            }
        }
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}

/// Re-check a level file against the difficulty's rules and solvability.
fn check(config: &GeneratorConfig, difficulty: Difficulty, path: &PathBuf) -> u8 {
    let data: String = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(error) => {
            eprintln!("Cannot read {}: {error}", path.display());
            return 1;
        }
    };
    let level: GenerationResult = match serde_json::from_str(&data) {
        Ok(level) => level,
        Err(error) => {
            eprintln!("Cannot parse {}: {error}", path.display());
            return 1;
        }
    };

    let report: ValidationReport = generator::validate(
        config,
        difficulty,
        &level.stands,
        &level.tasks,
        level.adjusted_total,
    );
    println!("{}", report.message);
    u8::from(!report.success)
}
