// SPDX-License-Identifier: Apache-2.0
//! Domain error types. Handlers in `game-server` translate these into the
//! HTTP error taxonomy from spec.md §7; nothing here talks JSON or HTTP.

use thiserror::Error;

/// Failure adding a map or something to a map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddMapError {
    #[error("map with id {0} already exists")]
    DuplicateMap(String),
    #[error("office with id {0} already exists on this map")]
    DuplicateOffice(String),
}

/// Failure joining a game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinGameError {
    #[error("map with id {0} not found")]
    MapNotFound(String),
}
