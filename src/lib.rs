pub mod api;
pub mod auth;
pub mod cli;
pub mod cors;
pub mod db;
pub mod jwt;

use api::create_api_router;
use axum::{Router, middleware};
use cors::CorsConfig;
use db::Database;
use jwt::JwtConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Service domain, used as token issuer and audience
    pub domain: String,
    /// Origin allowed to make credentialed cross-origin calls
    pub allowed_origin: String,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret, &config.domain));

    let cors_config =
        CorsConfig::new(&config.allowed_origin).expect("Invalid allowed-origin value");

    create_api_router(config.db.clone(), jwt)
        .layer(middleware::from_fn_with_state(cors_config, cors::cors))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> (tokio::task::JoinHandle<()>, SocketAddr) {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        run_server(config, listener).await.ok();
    });

    (handle, local_addr)
}
