//! msgqueue Server
//!
//! HTTP message queue with API-key authentication, plus out-of-band
//! administration commands for provisioning users and keys.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use msgqueue_core::config::{self, Config};
use msgqueue_core::tracing_init;
use msgqueue_server::auth::digest::hash_secret;
use msgqueue_server::auth::{ApiKeyManager, Role};
use msgqueue_server::retention;
use msgqueue_server::server::{AppState, build_router};
use msgqueue_server::storage::QueueDatabase;

#[derive(Parser, Debug)]
#[command(name = "msgqueue-server")]
#[command(version, about = "msgqueue server - authenticated JSON message queue")]
struct Args {
    /// Path to a JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to SQLite database file.
    #[arg(long, env = "DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Create a user that can log in.
    AddUser {
        #[arg(long)]
        username: String,

        #[arg(long, env = "MSGQUEUE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Issue an API key for an existing user, replacing any key it holds.
    IssueKey {
        #[arg(long)]
        username: String,

        #[arg(long, default_value = "user")]
        role: Role,
    },
}

/// Server options, accepted with or without the `serve` subcommand.
#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", global = true)]
    addr: Option<SocketAddr>,

    /// Purge messages older than this many days in the background.
    #[arg(long, global = true)]
    retention_days: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(path) = &args.db_path {
        config.server.database_path = Some(path.clone());
    }
    config.server.log_json |= args.log_json;

    tracing_init::init_tracing(
        &tracing_init::default_filter("msgqueue_server", &config.server.log_level),
        config.server.log_json,
    );

    let db_path = match &config.server.database_path {
        Some(path) => path.clone(),
        None => config::default_database_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?,
    };
    info!(path = %db_path.display(), "Opening queue database");
    let db = QueueDatabase::open(&db_path).await?;

    match args.command {
        None | Some(Command::Serve) => serve(db, config, args.serve).await,
        Some(Command::AddUser { username, password }) => add_user(&db, &username, &password).await,
        Some(Command::IssueKey { username, role }) => issue_key(db, &username, role).await,
    }
}

async fn serve(db: QueueDatabase, mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if args.retention_days.is_some() {
        config.retention.max_age_days = args.retention_days;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.addr,
        "Starting msgqueue-server"
    );

    let state = AppState::new(db);

    if let Some(days) = config.retention.max_age_days {
        anyhow::ensure!(days > 0, "retention days must be positive, got {days}");
        info!(days, interval_secs = config.retention.interval_secs, "Retention purge enabled");
        retention::spawn(
            state.messages.clone(),
            days,
            Duration::from_secs(config.retention.interval_secs),
        )?;
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn add_user(db: &QueueDatabase, username: &str, password: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!username.is_empty(), "username must not be empty");
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    let user = db
        .create_user(username, &hash_secret(password))
        .await
        .with_context(|| format!("Failed to create user {username}"))?;

    info!(user_id = user.id, username = %user.username, "User created");
    Ok(())
}

#[allow(clippy::print_stdout)]
async fn issue_key(db: QueueDatabase, username: &str, role: Role) -> anyhow::Result<()> {
    let user = db
        .get_user_by_username(username)
        .await
        .with_context(|| format!("Unknown user {username}"))?;

    let token = ApiKeyManager::new(db).issue_key(user.id, role).await?;
    println!("{token}");
    Ok(())
}
