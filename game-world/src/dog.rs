// SPDX-License-Identifier: Apache-2.0
//! The kinematic entity a player controls, bound to a single map.

use serde::{Deserialize, Serialize};

use crate::map::{Map, MapId};

/// Facing direction, encoded as the wire characters the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "U")]
    North,
    #[serde(rename = "D")]
    South,
    #[serde(rename = "L")]
    West,
    #[serde(rename = "R")]
    East,
}

impl Direction {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::North => 'U',
            Self::South => 'D',
            Self::West => 'L',
            Self::East => 'R',
        }
    }
}

/// A dog's position/velocity/facing, plus a non-owning handle to the map
/// it lives on (looked up through [`crate::Game`]'s map table — see
/// DESIGN.md for why this isn't a raw reference).
#[derive(Debug, Clone)]
pub struct Dog {
    position: (f64, f64),
    velocity: (f64, f64),
    direction: Direction,
    map_id: MapId,
}

impl Dog {
    #[must_use]
    pub fn new(spawn_point: (f64, f64), map_id: MapId) -> Self {
        Self {
            position: spawn_point,
            velocity: (0.0, 0.0),
            direction: Direction::North,
            map_id,
        }
    }

    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    /// Sets velocity and, unless it is zero, updates facing to the axis
    /// of larger magnitude (ties broken towards the y axis, matching the
    /// original `std::abs(vx) > std::abs(vy)` test).
    pub fn set_speed(&mut self, vx: f64, vy: f64) {
        self.velocity = (vx, vy);
        if vx == 0.0 && vy == 0.0 {
            return;
        }
        self.direction = if vx.abs() > vy.abs() {
            if vx > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if vy > 0.0 {
            Direction::South
        } else {
            Direction::North
        };
    }

    /// Sets facing only; velocity is untouched.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Integrates position by `dt_millis`, clamping against `map`. Zeroes
    /// velocity when the clamp rejects the candidate (the dog hit a wall
    /// or ran off the end of its road).
    pub fn update_position(&mut self, dt_millis: i64, map: &Map) {
        if self.velocity == (0.0, 0.0) {
            return;
        }

        let dt = dt_millis as f64 / 1000.0;
        let candidate = (
            self.position.0 + self.velocity.0 * dt,
            self.position.1 + self.velocity.1 * dt,
        );

        let clamped = map.clamp_position(self.position, candidate);
        if clamped != candidate {
            self.set_speed(0.0, 0.0);
        }
        self.position = clamped;
    }
}
