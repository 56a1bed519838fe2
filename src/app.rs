/*
 * Responsibility
 * - Load config → build dependencies → assemble the Router
 * - Apply middleware (security headers / HTTP plumbing / CORS)
 * - Start axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::{MemoryTodoStore, PgTodoStore, TodoStore},
    services::{auth::build_authorizer, todos::TodoService},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,todo_api=debug,tower_http=debug
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

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting todo API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let store: Arc<dyn TodoStore> = match &config.database_url {
        Some(url) => Arc::new(
            PgTodoStore::connect(url)
                .await
                .context("failed to connect to the todo database")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL is not set; todos are kept in memory");
            Arc::new(MemoryTodoStore::new())
        }
    };
    tracing::info!(backend = store.backend_name(), "todo store ready");

    let todos = Arc::new(TodoService::new(store, config.attachment_base_url.clone()));

    let authorizer = build_authorizer(config).context("failed to build the token verifier")?;
    tracing::info!(jwks_url = %config.jwks_url, "token verifier ready");

    Ok(AppState::new(todos, authorizer))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::http::apply(router);
    // Outermost, so preflight requests are answered before the access check.
    middleware::cors::apply(router, config)
}
