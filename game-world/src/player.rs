// SPDX-License-Identifier: Apache-2.0
//! The player registry: players are stored once, by index; tokens and
//! dog ids are looked up through index tables rather than owning
//! references, so there is no ownership cycle (spec.md §9, "Shared
//! identity of Players").

use std::collections::HashMap;

use crate::dog::Dog;
use crate::token::Token;

/// A player's id, assigned monotonically from 0 as players join.
pub type PlayerId = u32;

/// A joined player: exactly one dog, exactly one token.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    dog: Dog,
    token: Token,
}

impl Player {
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dog(&self) -> &Dog {
        &self.dog
    }

    pub fn dog_mut(&mut self) -> &mut Dog {
        &mut self.dog
    }

    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// Ordered list of players (index == id) plus token→player and
/// dog-index→player lookup tables. Since a player owns exactly one dog,
/// the dog index and the player index coincide — no separate dog-id type
/// is needed (spec.md §9 flags the original's empty-string dog id as
/// accidental; this sidesteps it entirely by using the player id).
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    token_to_player: HashMap<String, PlayerId>,
}

impl PlayerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new player with `id == len()` before a token is known;
    /// the token is filled in separately via [`Self::assign_token`].
    pub fn add(&mut self, name: String, dog: Dog) -> PlayerId {
        let id = self.players.len() as PlayerId;
        self.players.push(Player {
            id,
            name,
            dog,
            token: Token::from_raw(String::new()),
        });
        id
    }

    /// Finalizes a just-added player by giving it its token. Must be
    /// called exactly once per player, immediately after `add`.
    pub fn assign_token(&mut self, id: PlayerId, token: Token) {
        self.token_to_player.insert(token.as_str().to_owned(), id);
        if let Some(player) = self.players.get_mut(id as usize) {
            player.token = token;
        }
    }

    #[must_use]
    pub fn find_by_token(&self, token: &Token) -> Option<&Player> {
        self.token_to_player
            .get(token.as_str())
            .and_then(|&id| self.players.get(id as usize))
    }

    pub fn find_by_id_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    #[must_use]
    pub fn list(&self) -> &[Player] {
        &self.players
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }
}
