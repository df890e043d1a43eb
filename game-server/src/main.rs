// SPDX-License-Identifier: Apache-2.0
//! `game_server`: the dog-game HTTP server binary (spec.md §6). Parses
//! CLI flags, loads the world from the config file, spawns the world
//! actor and (if configured) the auto-tick timer, then serves the JSON
//! API and static files on `0.0.0.0:8080` until SIGINT/SIGTERM.

use std::process::ExitCode;

use anyhow::{Context, Result};
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::BoxError;
use clap::Parser;
use game_server::{build_app, cli::Args, config, controller, ticker, ApiState};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LISTEN_ADDR: &str = "0.0.0.0:8080";
/// Per-connection idle budget (spec.md §5); enforced as a request
/// timeout until axum exposes a dedicated idle-vs-request distinction
/// (see SPEC_FULL.md §7 Open Questions).
const IDLE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("game_server: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut game = config::load_game(&args.config_file)
        .with_context(|| format!("loading config file {}", args.config_file.display()))?;
    game.set_random_spawn_points(args.randomize_spawn_points);

    let auto_tick_period = ticker::period_from_millis(args.tick_period);
    let (world, _world_task) = controller::spawn(game, auto_tick_period.is_some());

    let ticker_task = auto_tick_period.map(|period| {
        let world = world.clone();
        tokio::spawn(async move { ticker::run(world, period).await })
    });

    let state = ApiState {
        world,
        www_root: args.www_root,
    };
    let app = build_app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(IDLE_TIMEOUT),
    );

    let listener = TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("binding {LISTEN_ADDR}"))?;
    info!(addr = LISTEN_ADDR, "game_server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(ticker_task) = ticker_task {
        ticker_task.abort();
    }
    info!("game_server shut down cleanly");
    Ok(())
}

/// Converts a timed-out connection into a plain response so the
/// outermost service keeps an `Infallible` error type, as
/// `axum::serve` requires. `tower::timeout::Timeout` itself can only
/// report the timeout as an error, not a response — this is the
/// standard axum/tower pairing for that gap.
async fn handle_timeout_error(err: BoxError) -> StatusCode {
    if err.is::<tower::timeout::error::Elapsed>() {
        StatusCode::REQUEST_TIMEOUT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Waits for either SIGINT (Ctrl+C) or SIGTERM, whichever arrives first
/// — the same dual-signal shutdown shape as the teacher's
/// `echo-session-service` supervisor loop, adapted from a `Handle`
/// callback to `axum::serve`'s `with_graceful_shutdown` future.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(%err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
