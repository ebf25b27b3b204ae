use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Html;
use axum::{Router, routing::get};
use chrono::TimeDelta;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use palaver_api::{AppStateInner, SessionStore};

/// The polling browser client, served straight from the binary.
const CLIENT_PAGE: &str = include_str!("../static/index.html");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PALAVER_DB_PATH").unwrap_or_else(|_| "palaver.db".into());
    let host = std::env::var("PALAVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PALAVER_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;
    let session_ttl_secs: i64 = std::env::var("PALAVER_SESSION_TTL_SECS")
        .unwrap_or_else(|_| "86400".into())
        .parse()?;

    // Init stores
    let db = palaver_db::Database::open(&PathBuf::from(&db_path))?;
    let sessions = SessionStore::new(TimeDelta::seconds(session_ttl_secs));

    let state = Arc::new(AppStateInner { db, sessions });

    let app = Router::new()
        .route("/", get(client_page))
        .merge(palaver_api::router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Palaver chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn client_page() -> Html<&'static str> {
    Html(CLIENT_PAGE)
}
