// SPDX-License-Identifier: Apache-2.0
//! Loads the JSON world description (spec.md §6) into a [`game_world::Game`].
//! Modeled on the teacher's `echo-app-core::config` load-from-path pattern:
//! a typed `Deserialize` struct, `serde_json::from_str`, and `anyhow::Context`
//! for a readable failure message at startup.

use std::path::Path;

use anyhow::{Context, Result};
use game_world::{Building, Game, Map, MapId, Office, OfficeId, Road};
use serde::Deserialize;

use game_world::geometry::{Offset, Point, Rectangle, Size};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default = "default_dog_speed")]
    default_dog_speed: f64,
    maps: Vec<MapConfig>,
}

fn default_dog_speed() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapConfig {
    id: String,
    name: String,
    dog_speed: Option<f64>,
    roads: Vec<RoadConfig>,
    buildings: Vec<BuildingConfig>,
    offices: Vec<OfficeConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoadConfig {
    Horizontal { x0: i64, y0: i64, x1: i64 },
    Vertical { x0: i64, y0: i64, y1: i64 },
}

#[derive(Debug, Deserialize)]
struct BuildingConfig {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficeConfig {
    id: String,
    x: i64,
    y: i64,
    offset_x: i64,
    offset_y: i64,
}

/// Reads `path`, parses it against the schema in spec.md §6, and builds a
/// fully-populated [`Game`] (default dog speed, maps, roads, buildings,
/// offices). Fails loudly — the caller is expected to abort the process.
pub fn load_game(path: &Path) -> Result<Game> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed: ConfigFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    let mut game = Game::new(parsed.default_dog_speed);
    for map_cfg in parsed.maps {
        let dog_speed = map_cfg.dog_speed.unwrap_or(parsed.default_dog_speed);
        let mut map = Map::new(MapId(map_cfg.id.clone()), map_cfg.name, dog_speed);

        for road in map_cfg.roads {
            map.add_road(match road {
                RoadConfig::Horizontal { x0, y0, x1 } => Road::Horizontal {
                    start: Point::new(x0, y0),
                    end_x: x1,
                },
                RoadConfig::Vertical { x0, y0, y1 } => Road::Vertical {
                    start: Point::new(x0, y0),
                    end_y: y1,
                },
            });
        }

        for building in map_cfg.buildings {
            map.add_building(Building {
                bounds: Rectangle {
                    position: Point::new(building.x, building.y),
                    size: Size {
                        width: building.w,
                        height: building.h,
                    },
                },
            });
        }

        for office in map_cfg.offices {
            map.add_office(Office {
                id: OfficeId(office.id),
                position: Point::new(office.x, office.y),
                offset: Offset {
                    dx: office.offset_x,
                    dy: office.offset_y,
                },
            })
            .with_context(|| format!("in map {}", map_cfg.id))?;
        }

        game.add_map(map)
            .with_context(|| format!("loading map {}", map_cfg.id))?;
    }

    Ok(game)
}
