use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keygate_backend::config::Config;
use keygate_backend::db::connection::{create_pool, DbPool};
use keygate_backend::repositories::{PgSessionKeyStore, PgUsageStore, PgUserStore};
use keygate_backend::state::AppState;

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keygate_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        admin_password = %mask_secret(&config.admin_password),
        jwt_expiration_hours = config.jwt_expiration_hours,
        admin_jwt_expiration_hours = config.admin_jwt_expiration_hours,
        port = config.port,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let port = config.port;
    let state = AppState::new(
        config,
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgSessionKeyStore::new(pool.clone())),
        Arc::new(PgUsageStore::new(pool)),
    );

    let app = keygate_backend::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
