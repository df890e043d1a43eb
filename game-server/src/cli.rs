// SPDX-License-Identifier: Apache-2.0
//! Command-line argument parsing (spec.md §6), following the teacher's
//! `#[derive(Parser)] struct Args` shape in `echo-session-ws-gateway`.

use std::path::PathBuf;

use clap::Parser;

/// Multiplayer dog-game world server.
#[derive(Parser, Debug)]
#[command(name = "game_server", author, version, about)]
pub struct Args {
    /// Path to the game configuration JSON file.
    #[arg(long)]
    pub config_file: PathBuf,

    /// Path to the directory of static files served outside `/api/`.
    #[arg(long)]
    pub www_root: PathBuf,

    /// Auto-tick period in milliseconds. Must be positive. When absent,
    /// the server runs in manual-tick mode and accepts
    /// `POST /api/v1/game/tick`.
    #[arg(long, value_parser = positive_millis)]
    pub tick_period: Option<i64>,

    /// Spawn dogs at random points along a map's roads instead of the
    /// map's fixed spawn point.
    #[arg(long)]
    pub randomize_spawn_points: bool,
}

fn positive_millis(s: &str) -> Result<i64, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("`{s}` is not an integer"))?;
    if value <= 0 {
        return Err("tick period must be positive".to_owned());
    }
    Ok(value)
}
