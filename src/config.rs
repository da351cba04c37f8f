//! Command-line and environment configuration.

use clap::Parser;
use log::LevelFilter;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("No address matches {host}:{port}")]
    NoAddress { host: String, port: u16 },

    #[error("Failed to start logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "review-assign", version, about = "Pull request reviewer assignment service")]
pub struct Config {
    /// Turns off message output. Passing once keeps only warnings and errors;
    /// passing twice or more disables all logging.
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Increases the verbosity. Passing twice also shows SQL statements.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path of the SQLite database file.
    #[arg(long = "db", env = "DATABASE_PATH", default_value = "review-assign.db")]
    pub database_path: PathBuf,

    /// The host to serve on.
    #[arg(short = 'H', long = "host", env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// The port to serve on.
    #[arg(short = 'P', long = "port", env = "HTTP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds a single request may run before it is abandoned.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Seconds to drain open connections on shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Get the address to serve on.
    pub fn serve_addr(&self) -> Result<SocketAddr, ConfigError> {
        let mut addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| ConfigError::Resolve {
                host: self.host.clone(),
                port: self.port,
                source,
            })?;

        addrs.next().ok_or_else(|| ConfigError::NoAddress {
            host: self.host.clone(),
            port: self.port,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Console log level selected by `-q` and `-v`, or `None` when logging is off.
    pub fn log_level(&self) -> Option<LevelFilter> {
        match (self.quiet, self.verbose) {
            (q, _) if q >= 2 => None,
            (1, _) => Some(LevelFilter::Warn),
            (_, 0) => Some(LevelFilter::Info),
            (_, 1) => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }

    /// Sets up logging to stderr as specified by the `-q` and `-v` flags.
    pub fn start_logger(&self) -> Result<(), ConfigError> {
        use fern::Dispatch;

        let level = match self.log_level() {
            Some(level) => level,
            None => return Ok(()),
        };

        // Per-statement logs from sqlx only show up at -vv.
        let sqlx_level = if self.verbose >= 2 {
            level
        } else {
            level.min(LevelFilter::Warn)
        };

        Dispatch::new()
            .level(level)
            .level_for("sqlx", sqlx_level)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(std::io::stderr())
            .apply()?;

        Ok(())
    }
}
