// SPDX-License-Identifier: Apache-2.0
//! Basic integer geometry types shared by roads, buildings and offices.

use serde::{Deserialize, Serialize};

pub type Coord = i64;
pub type Dimension = i64;

/// An integer map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[must_use]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

/// An axis-aligned rectangle: `position` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub position: Point,
    pub size: Size,
}

impl Rectangle {
    /// Half-open containment test: `[x, x+w) × [y, y+h)`.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let min_x = self.position.x as f64;
        let min_y = self.position.y as f64;
        x >= min_x
            && x < min_x + self.size.width as f64
            && y >= min_y
            && y < min_y + self.size.height as f64
    }
}

/// A displacement, used by offices to describe their delivery point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: Dimension,
    pub dy: Dimension,
}
