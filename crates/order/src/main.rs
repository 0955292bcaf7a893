use anyhow::{Context, Result};
use axum::{Router, routing::get};
use order::{
    abstract_trait::order::service::OrderCommandServiceTrait, config::myconfig::Config,
    metrics::metrics_handler, state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{RequestContext, Telemetry, init_logger},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::broadcast, task::JoinHandle};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

struct Setup {
    config: Config,
    state: Arc<AppState>,
    telemetry: Telemetry,
    _log_guard: Option<WorkerGuard>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let setup = setup().await.context("Failed to setup application")?;

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let handles = vec![
        spawn_metrics_server(
            setup.config.metric_port,
            setup.state.clone(),
            shutdown_tx.subscribe(),
        )
        .await
        .context("Failed to start metrics server")?,
        spawn_recovery_loop(
            setup.config.recovery_interval,
            setup.state.clone(),
            shutdown_tx.subscribe(),
        ),
    ];

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received (Ctrl+C).");
        }
        _ = shutdown_rx.recv() => {
            info!("🛑 Shutdown signal received from internal component.");
        }
    }

    if let Err(e) = shutdown_tx.send(()) {
        warn!("Failed to broadcast shutdown signal: {}", e);
    }

    shutdown(setup.telemetry, handles).await;

    Ok(())
}

async fn setup() -> Result<Setup> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("order-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let log_guard = init_logger(
        telemetry.logger_provider(),
        "order-service",
        is_dev,
        is_enable_file,
    );

    let db_pool =
        ConnectionManager::new_pool(&config.database_url, config.db_min_conn, config.db_max_conn)
            .await
            .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migration database")?;
    }

    let state = Arc::new(AppState::new(db_pool, &config));

    info!(
        "✅ Application setup completed successfully (item delta policy: {}).",
        config.item_delta_policy
    );

    Ok(Setup {
        config,
        state,
        telemetry,
        _log_guard: log_guard,
    })
}

async fn spawn_metrics_server(
    port: u16,
    state: Arc<AppState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<JoinHandle<()>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    info!("📈 Metrics server listening on {addr}");

    Ok(tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Metrics server received shutdown signal");
        });

        if let Err(e) = server.await {
            error!("Metrics server failed: {e}");
        }
    }))
}

/// Rolls unfinished lifecycle cascades forward at startup and then on every tick.
fn spawn_recovery_loop(
    interval: Duration,
    state: Arc<AppState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let ctx = RequestContext::with_timeout(interval);
                    match state.di_container.order_command.recover_pending_cascades(&ctx).await {
                        Ok(response) if response.data > 0 => {
                            info!("🩹 Recovered {} pending lifecycle cascades", response.data);
                        }
                        Ok(_) => {}
                        Err(e) => error!("❌ Lifecycle recovery pass failed: {e}"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Recovery loop received shutdown signal");
                    break;
                }
            }
        }
    })
}

async fn shutdown(telemetry: Telemetry, handles: Vec<JoinHandle<()>>) {
    info!("🛑 Shutting down background tasks...");

    let shutdown_timeout = Duration::from_secs(30);
    let shutdown_result =
        tokio::time::timeout(shutdown_timeout, join_tasks(handles)).await;

    match shutdown_result {
        Ok(()) => info!("✅ All tasks shutdown gracefully."),
        Err(_) => warn!("⚠️  Shutdown timeout reached, forcing exit."),
    }

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Order Service shutdown complete.");
}

async fn join_tasks(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            error!("Background task panicked: {}", e);
        }
    }
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
