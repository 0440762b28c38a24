//! catalog-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API over HTTP.
//!
//! # Provisioning an admin
//!
//! Self-registration only ever creates standard users. Admins are created
//! from the command line; the password is read from stdin:
//!
//! ```text
//! cargo run -p catalog-server -- --create-admin root@example.com --name "Root"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use catalog_core::{
  account::{MIN_SECRET_LEN, NewAccount, Role},
  store::CatalogStore,
};
use catalog_server::{AppState, ServerConfig, password, session::SessionManager};
use catalog_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Course catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an admin account with this e-mail (password on stdin) and exit.
  #[arg(long, value_name = "EMAIL")]
  create_admin: Option<String>,

  /// Display name for `--create-admin`.
  #[arg(long, default_value = "Administrator", requires = "create_admin")]
  name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CATALOG"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  server_cfg.session_ttl().context("invalid configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(identity) = cli.create_admin {
    return create_admin(&store, identity, cli.name).await;
  }

  let state = AppState::new(store, server_cfg.clone()).context("invalid configuration")?;
  spawn_session_sweeper(
    Arc::clone(&state.sessions),
    Duration::from_secs(server_cfg.session_sweep_secs.max(1)),
  );

  let app = catalog_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Out-of-band admin provisioning.
async fn create_admin(
  store: &SqliteStore,
  identity: String,
  name: String,
) -> anyhow::Result<()> {
  let secret = read_password()?;
  if secret.chars().count() < MIN_SECRET_LEN {
    anyhow::bail!("password must be at least {MIN_SECRET_LEN} characters long");
  }

  let password_hash = password::hash_secret_blocking(secret)
    .await
    .context("failed to hash password")?;

  let account = store
    .insert_account(NewAccount {
      name,
      identity,
      phone: None,
      password_hash,
      role: Role::Admin,
    })
    .await
    .context("failed to create admin account")?;

  tracing::info!(account_id = account.id, identity = %account.identity, "admin account created");
  Ok(())
}

/// Periodically drop expired sessions so the table does not grow without
/// bound. Expiry itself is enforced on every lookup.
fn spawn_session_sweeper(sessions: Arc<SessionManager>, every: Duration) {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    loop {
      ticker.tick().await;
      let purged = sessions.purge_expired(chrono::Utc::now());
      if purged > 0 {
        tracing::debug!(purged, remaining = sessions.len(), "swept expired sessions");
      }
    }
  });
}

/// Read one line from stdin as the password.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
