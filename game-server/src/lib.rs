// SPDX-License-Identifier: Apache-2.0
//! Library surface for the `game_server` binary, split out so integration
//! tests can build the same [`axum::Router`] the binary serves without
//! going through `main`. Mirrors the teacher's habit (see
//! `echo-session-proto`) of keeping wire/service logic in a library crate
//! and the binary thin.

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod static_files;
pub mod ticker;

use std::path::PathBuf;

use axum::Router;

use controller::WorldHandle;

/// Shared state handed to every axum handler: a handle to the world actor
/// and the static-file root. Cheap to clone (the handle is an `mpsc`
/// sender, the path an `Arc`-free `PathBuf` clone).
#[derive(Clone)]
pub struct ApiState {
    pub world: WorldHandle,
    pub www_root: PathBuf,
}

/// Builds the full application router: the versioned JSON API under
/// `/api/v1`, the static-file fallback for everything else, and the
/// method/error-shape middleware described in spec.md §4.7.
#[must_use]
pub fn build_app(state: ApiState) -> Router {
    api::router(state)
}
