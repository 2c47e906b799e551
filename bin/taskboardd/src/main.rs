//! `taskboardd` — the task board server binary.
//!
//! Usage:
//!   taskboardd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/taskboard/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use taskboard_core::Module;

use config::ServerConfig;

/// Task board server.
#[derive(Parser, Debug)]
#[command(name = "taskboardd", about = "Task board server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    // Initialize storage (shared by all modules).
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let sql: Arc<dyn taskboard_sql::SQLStore> = Arc::new(
        taskboard_sql::SqliteStore::open(&data_dir.join("taskboard.db"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Initialize modules.
    let auth_config = auth::service::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        access_token_ttl: server_config.jwt.access_expire_secs,
        refresh_token_ttl: server_config.jwt.refresh_expire_secs,
    };
    let auth_module = auth::AuthModule::new(Arc::clone(&sql), auth_config)?;
    info!("Auth module initialized");

    let board_module = board::BoardModule::new(Arc::clone(auth_module.service()))?;
    info!("Board module initialized");

    // Bootstrap: ensure the admin account exists.
    bootstrap::ensure_admin(auth_module.service(), &server_config)?;

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (board_module.name(), board_module.routes()),
    ];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Task board server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
