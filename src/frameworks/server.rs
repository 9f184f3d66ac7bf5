// Framework bootstrap for the driving server runtime.

use crate::domain::city::generate_buildings;
use crate::domain::spawn::SpawnAllocator;
use crate::domain::tuning::{CityTuning, DriveTuning, PhysicsTuning, SpawnTuning};
use crate::frameworks::config;
use crate::frameworks::physics::RapierEngine;
use crate::interface_adapters::net::{status_handler, world_update_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::ConnectionIds;
use crate::use_cases::{
    GameEvent, GridInfo, SessionRegistry, SimStatus, Simulation, VehicleFactory, WorldState,
    WorldUpdate, world_task,
};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::http_host(), config::http_port());

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_simulation() -> Simulation {
    let city = CityTuning::default();
    let seed = config::city_seed();
    let mut city_rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let buildings = generate_buildings(&city, &mut city_rng);
    tracing::info!(buildings = buildings.len(), seed = ?seed, "city generated");

    let engine = RapierEngine::new(&PhysicsTuning::default());
    let world = WorldState::create_static_world(
        Box::new(engine),
        GridInfo {
            spacing: city.spacing,
            road_half: city.road_half,
        },
        buildings,
    );

    let spawns = SpawnAllocator::new(
        &SpawnTuning {
            spacing: city.spacing,
            ..SpawnTuning::default()
        },
        StdRng::from_entropy(),
    );
    let sessions = SessionRegistry::new(spawns, VehicleFactory::default());

    Simulation::new(world, sessions, DriveTuning::default(), config::fixed_dt())
}

fn build_state() -> Arc<AppState> {
    // input_tx/rx: connection lifecycle and inputs go to the single simulation task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    let (world_tx, _world_rx) = broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (status_tx, status_rx) = watch::channel(SimStatus::default());

    // Subscribe the serializer before the first tick can be broadcast.
    tokio::spawn(world_update_serializer(
        world_tx.subscribe(),
        world_bytes_tx.clone(),
        world_latest_tx.clone(),
    ));

    tokio::spawn(world_task(
        build_simulation(),
        input_rx,
        world_tx,
        status_tx,
        config::TICK_INTERVAL,
    ));

    Arc::new(AppState {
        connection_ids: ConnectionIds::new(),
        input_tx,
        world_bytes_tx,
        world_latest_tx,
        status_rx,
    })
}
