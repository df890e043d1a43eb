// SPDX-License-Identifier: Apache-2.0
//! The concurrency controller (spec.md §4.6 / §9 "Strand as serialization").
//!
//! A dedicated tokio task owns the [`Game`] exclusively and drains a
//! command channel one message at a time: this gives FIFO ordering of
//! submissions and mutual exclusion of world mutations for free, without
//! a mutex, because nothing outside this task ever touches `Game`. HTTP
//! handlers and the ticker both talk to it only through [`WorldHandle`],
//! sending a command and awaiting a `oneshot` reply — mirroring how
//! `echo-session-service::handle_client` spawns one task per connection
//! that only ever reaches `HubState` through a shared handle.

use game_world::{Game, JoinGameError, Map, MapId, Player, Token};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// A player's move command, already validated into one of the five legal
/// values by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
    Stop,
}

/// Manual-tick rejected because the server is running in auto-tick mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("manual tick is disabled while auto-tick is active")]
pub struct AutoTickActive;

enum Command {
    ListMaps(oneshot::Sender<Vec<(MapId, String)>>),
    MapDetail(MapId, oneshot::Sender<Option<Map>>),
    Join {
        name: String,
        map_id: MapId,
        reply: oneshot::Sender<Result<(Token, u32), JoinGameError>>,
    },
    VisiblePlayers {
        token: Token,
        reply: oneshot::Sender<Option<Vec<Player>>>,
    },
    Action {
        token: Token,
        mv: Move,
        reply: oneshot::Sender<Option<()>>,
    },
    ManualTick {
        dt_millis: i64,
        reply: oneshot::Sender<Result<(), AutoTickActive>>,
    },
    AutoTick {
        dt_millis: i64,
    },
    IsAutoTickActive(oneshot::Sender<bool>),
}

/// A cheaply-cloneable handle to the world actor. Every clone shares the
/// same underlying channel, so FIFO order is per-sender-task, matching
/// the "within a single HTTP connection, requests are processed
/// sequentially" requirement in spec.md §5.
#[derive(Clone)]
pub struct WorldHandle {
    tx: mpsc::Sender<Command>,
}

impl WorldHandle {
    pub async fn list_maps(&self) -> Vec<(MapId, String)> {
        self.call(Command::ListMaps).await
    }

    pub async fn map_detail(&self, id: MapId) -> Option<Map> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::MapDetail(id, reply)).await;
        rx.await.unwrap_or(None)
    }

    pub async fn join(
        &self,
        name: String,
        map_id: MapId,
    ) -> Result<(Token, u32), JoinGameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Join {
            name,
            map_id,
            reply,
        })
        .await;
        rx.await
            .unwrap_or_else(|_| Err(JoinGameError::MapNotFound(String::new())))
    }

    /// Players sharing a map with `token`'s owner, or `None` if the token
    /// is well-formed but unknown.
    pub async fn visible_players(&self, token: Token) -> Option<Vec<Player>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::VisiblePlayers { token, reply }).await;
        rx.await.ok().flatten()
    }

    /// Applies `mv` to `token`'s dog. `None` if the token is unknown.
    pub async fn act(&self, token: Token, mv: Move) -> Option<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Action { token, mv, reply }).await;
        rx.await.ok().flatten()
    }

    /// Runs a manual tick. Rejected if auto-tick is active.
    pub async fn manual_tick(&self, dt_millis: i64) -> Result<(), AutoTickActive> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ManualTick { dt_millis, reply }).await;
        rx.await.unwrap_or(Err(AutoTickActive))
    }

    /// Fire-and-forget tick used by the periodic ticker.
    pub async fn auto_tick(&self, dt_millis: i64) {
        self.send(Command::AutoTick { dt_millis }).await;
    }

    /// Whether the server is running in auto-tick mode. Checked by the
    /// `tick` handler *before* it validates content-type/body, mirroring
    /// `request_handler.cpp`'s precedence: a manual-tick request is
    /// `badRequest` while auto-tick is active regardless of what else is
    /// wrong with the request.
    pub async fn is_auto_tick_active(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        self.send(Command::IsAutoTickActive(reply)).await;
        rx.await.unwrap_or(false)
    }

    async fn send(&self, cmd: Command) {
        if self.tx.send(cmd).await.is_err() {
            warn!("world actor is gone; dropping command");
        }
    }

    async fn call<T: Default>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> T {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await;
        rx.await.unwrap_or_default()
    }
}

/// Spawns the world actor, handing ownership of `game` to it, and returns
/// a handle plus the tick-mode flag the ticker needs to decide whether it
/// should run at all. `auto_tick` is fixed for the process lifetime,
/// matching spec.md's "manual-tick and auto-tick modes must be mutually
/// exclusive".
pub fn spawn(game: Game, auto_tick: bool) -> (WorldHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(256);
    let join_handle = tokio::spawn(run(game, rx, auto_tick));
    (WorldHandle { tx }, join_handle)
}

async fn run(mut game: Game, mut rx: mpsc::Receiver<Command>, auto_tick: bool) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::ListMaps(reply) => {
                let maps = game
                    .maps()
                    .iter()
                    .map(|m| (m.id().clone(), m.name().to_owned()))
                    .collect();
                let _ = reply.send(maps);
            }
            Command::MapDetail(id, reply) => {
                let _ = reply.send(game.find_map(&id).cloned());
            }
            Command::Join {
                name,
                map_id,
                reply,
            } => {
                let outcome = game.join_game(name, &map_id).map(|(id, token)| (token, id));
                let _ = reply.send(outcome);
            }
            Command::VisiblePlayers { token, reply } => {
                let result = visible_players(&game, &token);
                let _ = reply.send(result);
            }
            Command::Action { token, mv, reply } => {
                let result = apply_action(&mut game, &token, mv);
                let _ = reply.send(result);
            }
            Command::ManualTick { dt_millis, reply } => {
                if auto_tick {
                    let _ = reply.send(Err(AutoTickActive));
                } else {
                    game.update_state(dt_millis);
                    let _ = reply.send(Ok(()));
                }
            }
            Command::AutoTick { dt_millis } => {
                game.update_state(dt_millis);
            }
            Command::IsAutoTickActive(reply) => {
                let _ = reply.send(auto_tick);
            }
        }
    }
}

fn visible_players(game: &Game, token: &Token) -> Option<Vec<Player>> {
    let caller = game.find_player_by_token(token)?;
    let map_id = caller.dog().map_id().clone();
    Some(
        game.players()
            .iter()
            .filter(|p| *p.dog().map_id() == map_id)
            .cloned()
            .collect(),
    )
}

fn apply_action(game: &mut Game, token: &Token, mv: Move) -> Option<()> {
    let caller = game.find_player_by_token(token)?;
    let id = caller.id();
    let map_id = caller.dog().map_id().clone();
    let speed = game.find_map(&map_id).map_or(0.0, Map::dog_speed);

    let player = game.find_player_by_id_mut(id)?;
    let dog = player.dog_mut();
    match mv {
        Move::Left => {
            dog.set_direction(game_world::Direction::West);
            dog.set_speed(-speed, 0.0);
        }
        Move::Right => {
            dog.set_direction(game_world::Direction::East);
            dog.set_speed(speed, 0.0);
        }
        Move::Up => {
            dog.set_direction(game_world::Direction::North);
            dog.set_speed(0.0, -speed);
        }
        Move::Down => {
            dog.set_direction(game_world::Direction::South);
            dog.set_speed(0.0, speed);
        }
        Move::Stop => {
            dog.set_speed(0.0, 0.0);
        }
    }
    Some(())
}
