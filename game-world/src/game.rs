// SPDX-License-Identifier: Apache-2.0
//! The mutable aggregate: the map catalog (immutable after load), the
//! player registry, the token generator and the spawn-point policy. All
//! mutation is expected to happen from a single serialized caller (the
//! world actor in `game-server`); nothing here is `Sync`/locked itself.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dog::Dog;
use crate::error::{AddMapError, JoinGameError};
use crate::map::{Map, MapId, Road};
use crate::player::{Player, PlayerId, PlayerRegistry};
use crate::token::TokenGenerator;

/// Owns the world for the lifetime of the process.
pub struct Game {
    default_dog_speed: f64,
    maps: Vec<Map>,
    map_id_to_index: HashMap<MapId, usize>,
    players: PlayerRegistry,
    token_generator: TokenGenerator,
    randomize_spawn_points: bool,
    spawn_rng: StdRng,
}

impl Game {
    #[must_use]
    pub fn new(default_dog_speed: f64) -> Self {
        Self {
            default_dog_speed,
            maps: Vec::new(),
            map_id_to_index: HashMap::new(),
            players: PlayerRegistry::new(),
            token_generator: TokenGenerator::new(),
            randomize_spawn_points: false,
            spawn_rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn default_dog_speed(&self) -> f64 {
        self.default_dog_speed
    }

    #[must_use]
    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    #[must_use]
    pub fn find_map(&self, id: &MapId) -> Option<&Map> {
        self.map_id_to_index.get(id).map(|&i| &self.maps[i])
    }

    /// Fails if `map.id()` duplicates an existing map.
    pub fn add_map(&mut self, map: Map) -> Result<(), AddMapError> {
        if self.map_id_to_index.contains_key(map.id()) {
            return Err(AddMapError::DuplicateMap(map.id().as_str().to_owned()));
        }
        let index = self.maps.len();
        self.map_id_to_index.insert(map.id().clone(), index);
        self.maps.push(map);
        Ok(())
    }

    pub fn set_random_spawn_points(&mut self, randomize: bool) {
        self.randomize_spawn_points = randomize;
    }

    #[must_use]
    pub fn is_random_spawn_points(&self) -> bool {
        self.randomize_spawn_points
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.players.list()
    }

    #[must_use]
    pub fn find_player_by_token(&self, token: &crate::Token) -> Option<&Player> {
        self.players.find_by_token(token)
    }

    /// Joins `player_name` onto `map_id`, returning the new player's id.
    /// Spawn point is `map.spawn_point()` unless random spawn is on, in
    /// which case a road is picked uniformly and then a point uniformly
    /// along it (perpendicular coordinate fixed to the road's axis).
    pub fn join_game(
        &mut self,
        player_name: String,
        map_id: &MapId,
    ) -> Result<(PlayerId, crate::Token), JoinGameError> {
        let map = self
            .find_map(map_id)
            .ok_or_else(|| JoinGameError::MapNotFound(map_id.as_str().to_owned()))?;

        let spawn = if self.randomize_spawn_points {
            Self::random_spawn_point(map.roads(), &mut self.spawn_rng)
        } else {
            map.spawn_point()
        };

        let dog = Dog::new((spawn.x as f64, spawn.y as f64), map_id.clone());
        let id = self.players.add(player_name, dog);
        let token = self.token_generator.generate();
        self.players.assign_token(id, token.clone());
        Ok((id, token))
    }

    /// Looks up a player by id for in-place mutation (e.g. applying a
    /// move action).
    pub fn find_player_by_id_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.find_by_id_mut(id)
    }

    fn random_spawn_point(roads: &[Road], rng: &mut StdRng) -> crate::Point {
        let Some(road) = roads.get(rng.gen_range(0..roads.len().max(1))) else {
            return crate::Point::new(0, 0);
        };
        match *road {
            Road::Horizontal { start, end_x } => {
                let (lo, hi) = (start.x.min(end_x), start.x.max(end_x));
                crate::Point::new(rng.gen_range(lo..=hi), start.y)
            }
            Road::Vertical { start, end_y } => {
                let (lo, hi) = (start.y.min(end_y), start.y.max(end_y));
                crate::Point::new(start.x, rng.gen_range(lo..=hi))
            }
        }
    }

    /// Advances every player's dog by `dt_millis`. Order is irrelevant:
    /// dogs never interact with each other, only with the static map.
    pub fn update_state(&mut self, dt_millis: i64) {
        let maps = &self.maps;
        let map_id_to_index = &self.map_id_to_index;
        for player in self.players.iter_mut() {
            let Some(&index) = map_id_to_index.get(player.dog().map_id()) else {
                continue;
            };
            player.dog_mut().update_position(dt_millis, &maps[index]);
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::map::Road;
    use crate::Point;

    fn game_with_one_map() -> (Game, MapId) {
        let mut game = Game::new(1.0);
        let id = MapId("m1".into());
        let mut map = Map::new(id.clone(), "Map 1".into(), 1.0);
        map.add_road(Road::Horizontal {
            start: Point::new(0, 0),
            end_x: 10,
        });
        game.add_map(map).expect("fresh map id");
        (game, id)
    }

    #[test]
    fn join_game_assigns_sequential_ids_and_tokens() {
        let (mut game, map_id) = game_with_one_map();
        let (p0, t0) = game
            .join_game("alice".into(), &map_id)
            .expect("map exists");
        let (p1, t1) = game.join_game("bob".into(), &map_id).expect("map exists");
        assert_eq!(p0, 0);
        assert_eq!(p1, 1);
        assert_ne!(t0.as_str(), t1.as_str());
    }

    #[test]
    fn join_game_fails_for_unknown_map() {
        let (mut game, _) = game_with_one_map();
        let err = game
            .join_game("alice".into(), &MapId("nope".into()))
            .expect_err("map missing");
        assert!(matches!(err, JoinGameError::MapNotFound(id) if id == "nope"));
    }

    #[test]
    fn add_map_rejects_duplicate_id() {
        let (mut game, map_id) = game_with_one_map();
        let dup = Map::new(map_id, "dup".into(), 1.0);
        let err = game.add_map(dup).expect_err("duplicate id");
        assert!(matches!(err, AddMapError::DuplicateMap(id) if id == "m1"));
    }

    #[test]
    fn update_state_moves_dogs_on_their_own_map() {
        let (mut game, map_id) = game_with_one_map();
        let (id, _) = game.join_game("alice".into(), &map_id).expect("ok");
        game.find_player_by_id_mut(id)
            .expect("player present")
            .dog_mut()
            .set_speed(2.0, 0.0);
        game.update_state(1000);
        assert_eq!(game.players()[0].dog().position(), (2.0, 0.0));
    }

    #[test]
    fn two_stationary_ticks_are_no_ops() {
        let (mut game, map_id) = game_with_one_map();
        game.join_game("alice".into(), &map_id).expect("ok");
        game.update_state(1000);
        game.update_state(1000);
        assert_eq!(game.players()[0].dog().position(), (0.0, 0.0));
    }
}
