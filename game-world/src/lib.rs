// SPDX-License-Identifier: Apache-2.0
//! Immutable world topology (maps, roads, buildings, offices) and the
//! mutable game-state aggregate (players, dogs, tokens) for the dog-game
//! server. No I/O and no async here — callers serialize access.

pub mod dog;
pub mod error;
pub mod game;
pub mod geometry;
pub mod map;
pub mod player;
pub mod token;

pub use dog::{Dog, Direction};
pub use error::{AddMapError, JoinGameError};
pub use game::Game;
pub use geometry::{Offset, Point, Rectangle, Size};
pub use map::{Building, Map, MapId, Office, OfficeId, Road};
pub use player::{Player, PlayerId, PlayerRegistry};
pub use token::{Token, TokenGenerator};
