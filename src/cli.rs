//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use clap::Parser;
use tracing::{error, info};
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rosterd", about = "User records API with JWT session auth")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8090")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "rosterd.db", env = "ROSTERD_DATABASE")]
    pub database: String,

    /// Service domain, used as token issuer and audience (e.g., "example.com")
    #[arg(long, default_value = "example.com", env = "ROSTERD_DOMAIN")]
    pub domain: String,

    /// Origin allowed to make credentialed cross-origin calls
    #[arg(long, default_value = "http://localhost:8090")]
    pub allowed_origin: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Parse and validate the allowed-origin URL.
/// Returns None and logs an error if validation fails.
pub fn validate_allowed_origin(allowed_origin: &str) -> Option<Url> {
    let url = match Url::parse(allowed_origin) {
        Ok(url) => url,
        Err(e) => {
            error!(origin = %allowed_origin, error = %e, "Invalid allowed-origin URL");
            return None;
        }
    };

    let is_https = url.scheme() == "https";
    let is_localhost = url.host_str() == Some("localhost");

    if !is_https && !is_localhost {
        error!("allowed-origin must use HTTPS for non-localhost deployments");
        return None;
    }

    Some(url)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    domain: String,
    allowed_origin: String,
    jwt_secret: String,
) -> ServerConfig {
    ServerConfig {
        db,
        domain,
        allowed_origin,
        jwt_secret: jwt_secret.into_bytes(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
