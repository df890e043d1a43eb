// SPDX-License-Identifier: Apache-2.0
//! The versioned JSON API (spec.md §4.7 / §6): route table, auth
//! extraction, content-type discipline, and the uniform error shape.
//! Modeled on the teacher's `Router::new().route(...).with_state(...)`
//! style in `echo-session-ws-gateway::main`, generalized from one
//! WebSocket upgrade route to the small REST surface this server needs.

pub mod dto;
pub mod error;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use game_world::{MapId, Token};
use serde::Serialize;
use tracing::debug;

use self::dto::{
    ActionRequest, Empty, JoinRequest, JoinResponse, MapDetail, MapSummary, PlayersResponse,
    StateResponse, TickRequest,
};
use self::error::ApiError;
use crate::controller::AutoTickActive;
use crate::static_files;
use crate::ApiState;

const APPLICATION_JSON: &str = "application/json";

/// Builds the full router: the `/api/v1` JSON surface, a catch-all 400
/// for any other `/api/...` path, and the static-file fallback for
/// everything else — then wraps the whole thing in a response-rewriting
/// layer so axum's own 405 responses (correct `Allow` header, empty
/// body) come out in this API's `{"code":...}` shape, satisfying the
/// "method not GET/HEAD/POST" pre-check in spec.md §4.7 uniformly for
/// API and static routes alike.
#[must_use]
pub fn router(state: ApiState) -> Router {
    let v1 = Router::new()
        .route("/maps", get(list_maps))
        .route("/maps/:id", get(map_detail))
        .route("/game/join", post(join))
        .route("/game/players", get(list_players))
        .route("/game/state", get(game_state))
        .route("/game/player/action", post(player_action))
        .route("/game/tick", post(tick));

    let api = Router::new().nest("/v1", v1).fallback(api_not_found);

    Router::new()
        .nest("/api", api)
        .fallback(static_files::serve)
        .with_state(state)
        .layer(axum::middleware::map_response(
            rewrite_method_not_allowed,
        ))
}

/// Any `/api/...` path that didn't match a known endpoint (spec.md §4.7,
/// last row of the endpoint table).
async fn api_not_found() -> ApiError {
    ApiError::BadRequest
}

/// axum's built-in per-route 405 (real `Allow` header, empty body) gets
/// rewritten into this API's JSON error shape without losing that
/// header — the header is the one piece of per-endpoint knowledge axum
/// already computed for us.
async fn rewrite_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = (
        StatusCode::METHOD_NOT_ALLOWED,
        json_headers(),
        Json(serde_json::json!({
            "code": "invalidMethod",
            "message": "Only GET, HEAD and POST methods are expected",
        })),
    )
        .into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// `Content-Type: application/json` + `Cache-Control: no-cache`, required
/// on every API response per spec.md §4.7.
pub(crate) fn json_headers() -> [(header::HeaderName, HeaderValue); 2] {
    [
        (header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON)),
        (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
    ]
}

fn api_json<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, json_headers(), Json(body)).into_response()
}

/// Requires an exact `application/json` content type; anything else
/// (missing header, wrong media type, parameters appended) is
/// `invalidArgument` per spec.md §4.7 "Content-type discipline".
fn require_json_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == APPLICATION_JSON);
    if is_json {
        Ok(())
    } else {
        Err(ApiError::InvalidArgument)
    }
}

fn parse_json_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidArgument)
}

/// Extracts the bearer token from `Authorization`. The header must be
/// exactly `Bearer <token>` with a 32-hex-character token to count as
/// well-formed; anything else (missing header, wrong scheme, wrong
/// length/charset) is `invalidToken`. A well-formed token simply isn't
/// resolved against the registry here — that's `unknownToken`, decided
/// by the caller once it asks the world actor.
fn extract_token(headers: &HeaderMap) -> Result<Token, ApiError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::InvalidToken)?;
    let candidate = raw.strip_prefix("Bearer ").ok_or(ApiError::InvalidToken)?;
    if Token::is_well_formed(candidate) {
        Ok(Token::from_raw(candidate.to_owned()))
    } else {
        Err(ApiError::InvalidToken)
    }
}

async fn list_maps(State(state): State<ApiState>) -> Response {
    let maps = state.world.list_maps().await;
    let summaries: Vec<MapSummary> = maps
        .into_iter()
        .map(|(id, name)| MapSummary {
            id: id.as_str().to_owned(),
            name,
        })
        .collect();
    api_json(summaries)
}

async fn map_detail(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.world.map_detail(MapId(id)).await {
        Some(map) => api_json(MapDetail::from(&map)),
        None => ApiError::MapNotFound.into_response(),
    }
}

async fn join(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(err) = require_json_content_type(&headers) {
        return err.into_response();
    }
    let request: JoinRequest = match parse_json_body(&body) {
        Ok(r) => r,
        Err(err) => return err.into_response(),
    };
    if request.user_name.is_empty() {
        return ApiError::InvalidArgument.into_response();
    }

    match state.world.join(request.user_name, MapId(request.map_id)).await {
        Ok((token, player_id)) => api_json(JoinResponse {
            auth_token: token.as_str().to_owned(),
            player_id,
        }),
        Err(_) => ApiError::MapNotFound.into_response(),
    }
}

async fn list_players(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let token = match extract_token(&headers) {
        Ok(t) => t,
        Err(err) => return err.into_response(),
    };
    match state.world.visible_players(token).await {
        Some(players) => api_json(PlayersResponse::from_iter(players)),
        None => ApiError::UnknownToken.into_response(),
    }
}

async fn game_state(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let token = match extract_token(&headers) {
        Ok(t) => t,
        Err(err) => return err.into_response(),
    };
    match state.world.visible_players(token).await {
        Some(players) => api_json(StateResponse::from_iter(players)),
        None => ApiError::UnknownToken.into_response(),
    }
}

async fn player_action(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(err) = require_json_content_type(&headers) {
        return err.into_response();
    }
    let token = match extract_token(&headers) {
        Ok(t) => t,
        Err(err) => return err.into_response(),
    };
    let request: ActionRequest = match parse_json_body(&body) {
        Ok(r) => r,
        Err(err) => return err.into_response(),
    };
    let Some(mv) = dto::parse_move(&request.move_) else {
        return ApiError::InvalidArgument.into_response();
    };

    match state.world.act(token, mv).await {
        Some(()) => api_json(Empty {}),
        None => ApiError::UnknownToken.into_response(),
    }
}

async fn tick(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Checked before content-type/body validation: `request_handler.cpp`
    // rejects any tick request while auto-tick is active regardless of
    // what else is wrong with it, so a malformed manual-tick POST made
    // against an auto-ticking server must still come back `badRequest`,
    // not `invalidArgument`.
    if state.world.is_auto_tick_active().await {
        debug!("rejected manual tick: auto-tick is active");
        return ApiError::BadRequest.into_response();
    }

    if let Err(err) = require_json_content_type(&headers) {
        return err.into_response();
    }
    let request: TickRequest = match parse_json_body(&body) {
        Ok(r) => r,
        Err(err) => return err.into_response(),
    };
    if request.time_delta <= 0 {
        return ApiError::InvalidArgument.into_response();
    }

    match state.world.manual_tick(request.time_delta).await {
        Ok(()) => api_json(Empty {}),
        Err(AutoTickActive) => {
            debug!("rejected manual tick: auto-tick is active");
            ApiError::BadRequest.into_response()
        }
    }
}
