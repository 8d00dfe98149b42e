use clap::Parser;
use rosterd::cli::{
    Args, build_config, init_logging, load_jwt_secret, open_database, validate_allowed_origin,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    if validate_allowed_origin(&args.allowed_origin).is_none() {
        std::process::exit(1);
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap();

    let config = build_config(db, args.domain, args.allowed_origin, jwt_secret);

    info!(address = %local_addr, "Listening");

    if let Err(e) = rosterd::run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
