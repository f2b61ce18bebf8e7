use std::process;

use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_tracker::accounts::Accounts;
use todo_tracker::config::{Backend, Config};
use todo_tracker::error::TodoError;
use todo_tracker::session::{generate_session_secret, SessionKeys};
use todo_tracker::state::AppState;
use todo_tracker::store::{FileStore, MemoryStore, PgStore, Store};
use todo_tracker::routes;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_tracker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration error");
            process::exit(1);
        }
    };

    let (store, accounts) = match open_store(&config).await {
        Ok(opened) => opened,
        Err(error) => {
            tracing::error!(%error, "could not open task store");
            process::exit(1);
        }
    };
    tracing::info!(backend = store.backend_name(), "task store ready");

    let secret = config.session_secret.clone().unwrap_or_else(|| {
        tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
        generate_session_secret()
    });
    let sessions = SessionKeys::new(secret.as_bytes(), Duration::hours(config.session_ttl_hours));

    let state = AppState::new(store, accounts, sessions);
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(config.addr()).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, addr = %config.addr(), "could not bind");
            process::exit(1);
        }
    };

    tracing::info!("server is chilling at http://{}", config.addr());

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "server stopped");
        process::exit(1);
    }
}

async fn open_store(config: &Config) -> Result<(Store, Accounts), TodoError> {
    let fixed = || Accounts::Fixed(config.users.clone());

    match config.backend {
        Backend::Memory => Ok((Store::Memory(MemoryStore::new()), fixed())),
        Backend::File => {
            tokio::fs::create_dir_all(&config.data_dir).await?;
            Ok((Store::File(FileStore::new(config.data_dir.clone())), fixed()))
        }
        Backend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            let store = PgStore::connect(url).await?;
            store.init_schema(&config.users).await?;
            let accounts = Accounts::Postgres(store.pool().clone());
            Ok((Store::Postgres(store), accounts))
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
