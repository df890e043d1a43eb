// SPDX-License-Identifier: Apache-2.0
//! Wire DTOs for the JSON API (spec.md §6). Kept separate from the
//! `game_world` domain types so the wire shape can diverge from the
//! in-memory representation without touching the library crate.

use std::collections::BTreeMap;

use game_world::{Building, Map, Office, Player, Road};
use serde::{Deserialize, Serialize};

use crate::controller::Move;

#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
}

impl From<&Map> for MapSummary {
    fn from(map: &Map) -> Self {
        Self {
            id: map.id().as_str().to_owned(),
            name: map.name().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoadDto {
    Horizontal { x0: i64, y0: i64, x1: i64 },
    Vertical { x0: i64, y0: i64, y1: i64 },
}

impl From<&Road> for RoadDto {
    fn from(road: &Road) -> Self {
        match *road {
            Road::Horizontal { start, end_x } => Self::Horizontal {
                x0: start.x,
                y0: start.y,
                x1: end_x,
            },
            Road::Vertical { start, end_y } => Self::Vertical {
                x0: start.x,
                y0: start.y,
                y1: end_y,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuildingDto {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl From<&Building> for BuildingDto {
    fn from(building: &Building) -> Self {
        Self {
            x: building.bounds.position.x,
            y: building.bounds.position.y,
            w: building.bounds.size.width,
            h: building.bounds.size.height,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDto {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub offset_x: i64,
    pub offset_y: i64,
}

impl From<&Office> for OfficeDto {
    fn from(office: &Office) -> Self {
        Self {
            id: office.id.0.clone(),
            x: office.position.x,
            y: office.position.y,
            offset_x: office.offset.dx,
            offset_y: office.offset.dy,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MapDetail {
    pub id: String,
    pub name: String,
    pub roads: Vec<RoadDto>,
    pub buildings: Vec<BuildingDto>,
    pub offices: Vec<OfficeDto>,
}

impl From<&Map> for MapDetail {
    fn from(map: &Map) -> Self {
        Self {
            id: map.id().as_str().to_owned(),
            name: map.name().to_owned(),
            roads: map.roads().iter().map(RoadDto::from).collect(),
            buildings: map.buildings().iter().map(BuildingDto::from).collect(),
            offices: map.offices().iter().map(OfficeDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub user_name: String,
    pub map_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub auth_token: String,
    pub player_id: u32,
}

#[derive(Debug, Serialize)]
pub struct PlayerName {
    pub name: String,
}

/// `{"0": {"name": "alice"}, …}`, ordered by numeric id for deterministic
/// output (a `BTreeMap<u32, _>` serializes keys as JSON strings).
#[derive(Debug, Serialize)]
pub struct PlayersResponse(pub BTreeMap<u32, PlayerName>);

impl FromIterator<Player> for PlayersResponse {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|p| (p.id(), PlayerName { name: p.name().to_owned() }))
                .collect(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DogState {
    pub pos: [f64; 2],
    pub speed: [f64; 2],
    pub dir: String,
}

impl From<&Player> for DogState {
    fn from(player: &Player) -> Self {
        let dog = player.dog();
        let (x, y) = dog.position();
        let (vx, vy) = dog.velocity();
        Self {
            pos: [x, y],
            speed: [vx, vy],
            dir: dog.direction().as_char().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub players: BTreeMap<u32, DogState>,
}

impl FromIterator<Player> for StateResponse {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter
                .into_iter()
                .map(|p| (p.id(), DogState::from(&p)))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "move")]
    pub move_: String,
}

/// Maps the wire `move` value to a controller command. `None` for any
/// value outside the five the API accepts (spec.md §4.7 "Action
/// semantics"); the caller turns that into `invalidArgument`.
#[must_use]
pub fn parse_move(raw: &str) -> Option<Move> {
    match raw {
        "L" => Some(Move::Left),
        "R" => Some(Move::Right),
        "U" => Some(Move::Up),
        "D" => Some(Move::Down),
        "" => Some(Move::Stop),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRequest {
    pub time_delta: i64,
}

#[derive(Debug, Serialize)]
pub struct Empty {}
