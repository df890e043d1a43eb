// SPDX-License-Identifier: Apache-2.0
//! Immutable world topology: roads, buildings, offices and the map that
//! owns them. Everything here is append-only during construction and
//! read-only afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AddMapError;
use crate::geometry::{Coord, Offset, Point, Rectangle};

/// Half-width of a road corridor, perpendicular to its axis, and the
/// overshoot allowed past each endpoint along the axis.
const ROAD_HALF_WIDTH: f64 = 0.5;

/// A map identifier, unique within a [`crate::Game`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub String);

impl MapId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An office identifier, unique within a single map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(pub String);

/// A straight road segment, horizontal or vertical, immutable once added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Road {
    Horizontal { start: Point, end_x: Coord },
    Vertical { start: Point, end_y: Coord },
}

impl Road {
    #[must_use]
    pub fn start(&self) -> Point {
        match self {
            Self::Horizontal { start, .. } | Self::Vertical { start, .. } => *start,
        }
    }

    /// The corridor perpendicular span test and axis snap for a candidate
    /// point. Returns the snapped `(x, y)` if the point falls within this
    /// road's corridor.
    fn accept(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match *self {
            Self::Horizontal { start, end_x } => {
                let min_x = start.x.min(end_x) as f64;
                let max_x = start.x.max(end_x) as f64;
                let y0 = start.y as f64;
                if (y - y0).abs() < ROAD_HALF_WIDTH
                    && x >= min_x - ROAD_HALF_WIDTH
                    && x <= max_x + ROAD_HALF_WIDTH
                {
                    Some((x, y0))
                } else {
                    None
                }
            }
            Self::Vertical { start, end_y } => {
                let min_y = start.y.min(end_y) as f64;
                let max_y = start.y.max(end_y) as f64;
                let x0 = start.x as f64;
                if (x - x0).abs() < ROAD_HALF_WIDTH
                    && y >= min_y - ROAD_HALF_WIDTH
                    && y <= max_y + ROAD_HALF_WIDTH
                {
                    Some((x0, y))
                } else {
                    None
                }
            }
        }
    }
}

/// A rectangular obstacle. A dog may never come to rest inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    pub bounds: Rectangle,
}

/// A delivery point, tagged with an id unique on its map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    pub id: OfficeId,
    pub position: Point,
    pub offset: Offset,
}

/// The immutable spatial graph a dog moves on, plus its display metadata
/// and default speed. Construction (`add_road`/`add_building`/`add_office`)
/// is the only mutation window; afterwards a `Map` is read-only.
#[derive(Debug, Clone)]
pub struct Map {
    id: MapId,
    name: String,
    dog_speed: f64,
    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    office_ids: HashSet<OfficeId>,
}

impl Map {
    #[must_use]
    pub fn new(id: MapId, name: String, dog_speed: f64) -> Self {
        Self {
            id,
            name,
            dog_speed,
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            office_ids: HashSet::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &MapId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dog_speed(&self) -> f64 {
        self.dog_speed
    }

    #[must_use]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    #[must_use]
    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn add_road(&mut self, road: Road) {
        self.roads.push(road);
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    /// Fails if `office.id` duplicates one already on this map.
    pub fn add_office(&mut self, office: Office) -> Result<(), AddMapError> {
        if !self.office_ids.insert(office.id.clone()) {
            return Err(AddMapError::DuplicateOffice(office.id.0));
        }
        self.offices.push(office);
        Ok(())
    }

    /// The start of road 0, or the origin if this map has no roads.
    #[must_use]
    pub fn spawn_point(&self) -> Point {
        self.roads.first().map_or(Point::new(0, 0), Road::start)
    }

    /// Clamp a candidate move against buildings then roads, in that order,
    /// first-match-wins over the road list. See spec.md §4.1 for the
    /// exact corridor/overshoot semantics; this is a line-for-line port of
    /// `Map::ClampPosition` from the original C++ solution.
    #[must_use]
    pub fn clamp_position(&self, old: (f64, f64), new: (f64, f64)) -> (f64, f64) {
        if self.roads.is_empty() {
            return new;
        }

        if self.buildings.iter().any(|b| b.bounds.contains(new.0, new.1)) {
            return old;
        }

        for road in &self.roads {
            if let Some(snapped) = road.accept(new.0, new.1) {
                return snapped;
            }
        }

        old
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn horizontal_map() -> Map {
        let mut map = Map::new(MapId("m1".into()), "Map 1".into(), 1.0);
        map.add_road(Road::Horizontal {
            start: Point::new(0, 0),
            end_x: 10,
        });
        map
    }

    #[test]
    fn spawn_point_is_first_road_start() {
        let map = horizontal_map();
        assert_eq!(map.spawn_point(), Point::new(0, 0));
    }

    #[test]
    fn spawn_point_defaults_to_origin_without_roads() {
        let map = Map::new(MapId("empty".into()), "Empty".into(), 1.0);
        assert_eq!(map.spawn_point(), Point::new(0, 0));
    }

    #[test]
    fn clamp_snaps_onto_corridor_axis() {
        let map = horizontal_map();
        let (x, y) = map.clamp_position((0.0, 0.0), (3.0, 0.2));
        assert!((x - 3.0).abs() < f64::EPSILON);
        assert!((y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_allows_half_unit_overshoot_past_end() {
        let map = horizontal_map();
        let (x, _) = map.clamp_position((9.0, 0.0), (10.5, 0.0));
        assert!((x - 10.5).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_rejects_past_overshoot_keeping_old_position() {
        let map = horizontal_map();
        let (x, y) = map.clamp_position((9.0, 0.0), (11.0, 0.0));
        assert!((x - 9.0).abs() < f64::EPSILON);
        assert!((y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_rejects_position_inside_building_even_on_road() {
        let mut map = horizontal_map();
        map.add_building(Building {
            bounds: Rectangle {
                position: Point::new(2, 0),
                size: crate::geometry::Size {
                    width: 2,
                    height: 2,
                },
            },
        });
        let (x, y) = map.clamp_position((0.0, 0.0), (3.0, 0.0));
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn clamp_without_roads_accepts_anything() {
        let map = Map::new(MapId("empty".into()), "Empty".into(), 1.0);
        let (x, y) = map.clamp_position((0.0, 0.0), (42.0, -7.0));
        assert_eq!((x, y), (42.0, -7.0));
    }

    #[test]
    fn add_office_rejects_duplicate_id() {
        let mut map = horizontal_map();
        let office = Office {
            id: OfficeId("o1".into()),
            position: Point::new(0, 0),
            offset: Offset { dx: 0, dy: 0 },
        };
        map.add_office(office.clone()).expect("first insert ok");
        let err = map.add_office(office).expect_err("duplicate must fail");
        assert!(matches!(err, AddMapError::DuplicateOffice(id) if id == "o1"));
    }
}
