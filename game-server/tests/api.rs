// SPDX-License-Identifier: Apache-2.0
//! Integration tests driving the axum [`Router`] in-process with
//! `tower::ServiceExt::oneshot`, the idiomatic way to exercise an axum
//! app without binding a real socket (see SPEC_FULL.md §3 "Test
//! tooling"). Each test is one of the concrete scenarios from spec.md §8.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use game_server::{build_app, controller, ApiState};
use game_world::geometry::Point;
use game_world::{Game, Map, MapId, Road};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn single_road_game(dog_speed: f64) -> Game {
    let mut game = Game::new(dog_speed);
    let mut map = Map::new(MapId("m1".into()), "Map One".into(), dog_speed);
    map.add_road(Road::Horizontal {
        start: Point::new(0, 0),
        end_x: 10,
    });
    game.add_map(map).expect("fresh map id");
    game
}

fn app(game: Game, auto_tick: bool) -> Router {
    let (world, _task) = controller::spawn(game, auto_tick);
    build_app(ApiState {
        world,
        www_root: PathBuf::from("."),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn join(app: &Router, user_name: &str, map_id: &str) -> (String, u64) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/join",
            None,
            json!({"userName": user_name, "mapId": map_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    (
        body["authToken"].as_str().unwrap().to_owned(),
        body["playerId"].as_u64().unwrap(),
    )
}

#[tokio::test]
async fn join_then_state_reports_spawn_point() {
    let app = app(single_road_game(1.0), false);
    let (token, player_id) = join(&app, "alice", "m1").await;
    assert_eq!(token.len(), 32);
    assert_eq!(player_id, 0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/state")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["players"]["0"]["pos"], json!([0.0, 0.0]));
    assert_eq!(body["players"]["0"]["speed"], json!([0.0, 0.0]));
    assert_eq!(body["players"]["0"]["dir"], "U");
}

#[tokio::test]
async fn move_east_then_tick_advances_position() {
    let app = app(single_road_game(2.0), false);
    let (token, _) = join(&app, "alice", "m1").await;

    let action = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/player/action",
            Some(&token),
            json!({"move": "R"}),
        ))
        .await
        .unwrap();
    assert_eq!(action.status(), StatusCode::OK);

    let tick = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/tick",
            None,
            json!({"timeDelta": 1000}),
        ))
        .await
        .unwrap();
    assert_eq!(tick.status(), StatusCode::OK);

    let state = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/state")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(state).await;
    assert_eq!(body["players"]["0"]["pos"], json!([2.0, 0.0]));
    assert_eq!(body["players"]["0"]["speed"], json!([2.0, 0.0]));
    assert_eq!(body["players"]["0"]["dir"], "R");
}

/// Per spec.md §4.1's `ClampPosition` algorithm (ported verbatim from
/// `original_source/.../model.cpp::ClampPosition`, see DESIGN.md): a
/// candidate that falls entirely outside every road's corridor — not
/// just past the half-unit overshoot — reverts to the pre-tick position
/// rather than snapping to the corridor's far edge. (spec.md §8
/// scenario 3's own worked numbers disagree with this algorithm; this
/// test follows §4.1 and the original source, which agree with each
/// other.)
#[tokio::test]
async fn clamps_at_road_end_and_zeroes_velocity() {
    let app = app(single_road_game(2.0), false);
    let (token, _) = join(&app, "alice", "m1").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/player/action",
            Some(&token),
            json!({"move": "R"}),
        ))
        .await
        .unwrap();

    let first_tick = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/tick",
            None,
            json!({"timeDelta": 3000}),
        ))
        .await
        .unwrap();
    assert_eq!(first_tick.status(), StatusCode::OK);

    let after_first = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/state")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        body_json(after_first).await["players"]["0"]["pos"],
        json!([6.0, 0.0])
    );

    let second_tick = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/tick",
            None,
            json!({"timeDelta": 3000}),
        ))
        .await
        .unwrap();
    assert_eq!(second_tick.status(), StatusCode::OK);

    let state = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/state")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(state).await;
    assert_eq!(body["players"]["0"]["pos"], json!([6.0, 0.0]));
    assert_eq!(body["players"]["0"]["speed"], json!([0.0, 0.0]));
}

#[tokio::test]
async fn wrong_method_rejects_with_allow_header() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/game/join")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidMethod");
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/players")
                .header(header::AUTHORIZATION, format!("Bearer {}", "0".repeat(32)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unknownToken");
}

#[tokio::test]
async fn malformed_token_is_invalid_not_unknown() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/players")
                .header(header::AUTHORIZATION, "Bearer short")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidToken");
}

#[tokio::test]
async fn manual_tick_rejected_when_auto_tick_active() {
    let app = app(single_road_game(1.0), true);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/game/tick",
            None,
            json!({"timeDelta": 1000}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "badRequest");
}

#[tokio::test]
async fn manual_tick_rejected_before_content_type_is_checked() {
    let app = app(single_road_game(1.0), true);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/game/tick")
                .body(Body::from(json!({"timeDelta": 1000}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "badRequest");
}

#[tokio::test]
async fn join_rejects_empty_user_name() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/game/join",
            None,
            json!({"userName": "", "mapId": "m1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidArgument");
}

#[tokio::test]
async fn join_rejects_unknown_map() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/game/join",
            None,
            json!({"userName": "alice", "mapId": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "mapNotFound");
}

#[tokio::test]
async fn join_without_json_content_type_is_invalid_argument() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/game/join")
                .body(Body::from(json!({"userName": "a", "mapId": "m1"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidArgument");
}

#[tokio::test]
async fn unknown_api_path_is_bad_request() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v2/whatever")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "badRequest");
}

#[tokio::test]
async fn action_with_empty_move_zeroes_velocity_but_keeps_direction() {
    let app = app(single_road_game(2.0), false);
    let (token, _) = join(&app, "alice", "m1").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/player/action",
            Some(&token),
            json!({"move": "R"}),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/game/player/action",
            Some(&token),
            json!({"move": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/game/state")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(state).await;
    assert_eq!(body["players"]["0"]["speed"], json!([0.0, 0.0]));
    assert_eq!(body["players"]["0"]["dir"], "R");
}

#[tokio::test]
async fn action_with_unknown_move_is_invalid_argument() {
    let app = app(single_road_game(1.0), false);
    let (token, _) = join(&app, "alice", "m1").await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/game/player/action",
            Some(&token),
            json!({"move": "X"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidArgument");
}

#[tokio::test]
async fn list_maps_and_map_detail_round_trip() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/maps")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!([{"id": "m1", "name": "Map One"}]));

    let detail = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/maps/m1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    let body = body_json(detail).await;
    assert_eq!(body["roads"], json!([{"x0": 0, "y0": 0, "x1": 10}]));
}

#[tokio::test]
async fn disallowed_method_on_static_branch_is_rejected() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/some/file.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalidMethod");
}

#[tokio::test]
async fn head_request_for_missing_static_file_has_no_body() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri("/definitely-not-a-real-file.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn map_detail_unknown_id_is_not_found() {
    let app = app(single_road_game(1.0), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/maps/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "mapNotFound");
}
