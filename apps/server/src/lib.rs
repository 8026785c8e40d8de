//! # MCQ Platform Server
//!
//! The HTTP API of the MCQ Platform, built on `Axum` and MySQL.
//!
//! ## Example
//! ```no_run
//! use mcq_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(8000)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

pub mod router;

use anyhow::{Context, Result, anyhow};
use axum_server::Handle;
use mcq::domain::config::ApiConfig;
use mcq::kernel::server::ApiState;
use mcq_database::{Database, redact};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Loads `KEY=value` lines from `path` into the process environment.
///
/// Returns `false` when the file does not exist.
///
/// # Errors
/// The file exists but cannot be read or parsed.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Opens the pool and migrates it when reachable.
    ///
    /// Never fails on an unusable database: the server then starts degraded.
    async fn init_database(&self) -> Result<Database> {
        let db_cfg = &self.cfg.database;
        let opened = Database::builder()
            .url(&db_cfg.url)
            .max_connections(db_cfg.max_connections)
            .min_connections(db_cfg.min_connections)
            .connect_timeout(Duration::from_secs(db_cfg.connect_timeout_seconds))
            .startup_retries(db_cfg.startup_retries)
            .init()
            .await;

        let db = match opened {
            Ok(db) => db,
            Err(e) => {
                warn!(url = %redact(&db_cfg.url), error = %e, "Database settings unusable, starting degraded");
                return Ok(Database::unavailable(db_cfg.url.as_str(), e.to_string()));
            },
        };

        if !db.is_ready() {
            warn!("Skipping migrations: database unreachable, data endpoints answer 503 until it recovers");
        } else if db_cfg.auto_migrate {
            db.migrate().await.context("Failed to apply database migrations")?;
        } else {
            info!("Automatic migrations disabled");
        }
        Ok(db)
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    warn!(
                        "SECURITY: SSL Private Key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Checks the TLS files when HTTPS is configured
    /// 2. Opens the MySQL pool, falling back to degraded mode
    /// 3. Applies the embedded migrations when the database is reachable
    /// 4. Initializes the feature slices and folds them into the [`ApiState`]
    /// 5. Builds the CORS policy
    ///
    /// # Errors
    /// Returns an error if:
    /// * SSL certificate/key files are missing
    /// * A migration fails or an applied migration changed
    /// * A feature slice cannot be initialized (e.g. unusable JWT settings)
    /// * A CORS origin is not a valid header value
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let db = self.init_database().await?;

        let slices =
            mcq::init(&self.cfg, &db).map_err(|e| anyhow!("Platform bootstrap failed: {e}"))?;

        let cors = router::cors_layer(&self.cfg.server)?;

        let state = slices
            .into_iter()
            .fold(ApiState::builder().config(self.cfg).db(db), |builder, slice| {
                builder.register_slice(slice)
            })
            .build()
            .context("Failed to finalize API state registry")?;
        Ok(Server { state, cors })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
    cors: tower_http::cors::CorsLayer,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address
    /// or if SSL/TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let grace = Duration::from_secs(cfg.server.shutdown_grace_seconds);

        info!(
            address = %address,
            ssl = cfg.server.ssl.is_some(),
            database_ready = self.state.database.is_ready(),
            "Starting server"
        );

        let app = router::init(self.state, self.cors);

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!(grace_seconds = grace.as_secs(), "Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
