/*
 * Responsibility
 * - Load Config → build dependencies → assemble the Router
 * - Router-level middleware (http plumbing, security headers, CORS)
 * - Serve with axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{cors, http, security_headers};
use crate::repos::{ActorRepo, MemoryCatalog, MovieRepo, PgCatalog};
use crate::services::auth::build_authorizer;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins, e.g. RUST_LOG=info,casting_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting casting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let auth = build_authorizer(config).map_err(|e| anyhow::anyhow!("{e}"))?;

    let (actors, movies): (Arc<dyn ActorRepo>, Arc<dyn MovieRepo>) = match &config.database_url
    {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(5))
                .connect(url)
                .await
                .context("connecting to DATABASE_URL")?;
            let catalog = Arc::new(PgCatalog::new(pool));
            catalog.migrate().await.context("running migrations")?;
            tracing::info!("catalog backed by postgres");
            let actors: Arc<dyn ActorRepo> = catalog.clone();
            let movies: Arc<dyn MovieRepo> = catalog;
            (actors, movies)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; catalog is in memory and lost on restart");
            let catalog = Arc::new(MemoryCatalog::new());
            let actors: Arc<dyn ActorRepo> = catalog.clone();
            let movies: Arc<dyn MovieRepo> = catalog;
            (actors, movies)
        }
    };

    Ok(AppState::new(auth, actors, movies))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let router = security_headers::apply(router);
    let router = cors::apply(router, config);
    http::apply(router)
}
