//! Server configuration.
//!
//! Every option can be given as a flag or an environment variable (a `.env`
//! file is loaded by the binary before parsing).

use std::time::Duration;

use clap::Parser;
use hiroma_shared::logger::LogFormat;
use thiserror::Error;

use crate::{
    hub::HubConfig,
    infrastructure::notification::{RetryPolicy, SubscriptionEntry},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("ping period ({ping}s) must be shorter than pong wait ({pong}s)")]
    PingNotBeforePong { ping: u64, pong: u64 },

    #[error("at least one allowed origin is required")]
    NoOrigins,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hiroma-server")]
#[command(about = "Room-based WebSocket chat relay", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Frames buffered per client before it is disconnected as too slow
    #[arg(long, env = "OUTBOUND_CAPACITY", default_value_t = 256)]
    pub outbound_capacity: usize,

    /// Largest accepted WebSocket frame/message in bytes
    #[arg(long, env = "MAX_FRAME_BYTES", default_value_t = 512)]
    pub max_frame_bytes: usize,

    /// Idle-read timeout in seconds, reset by every frame and pong
    #[arg(long, env = "PONG_WAIT_SECS", default_value_t = 60)]
    pub pong_wait_secs: u64,

    /// Keepalive ping interval in seconds
    #[arg(long, env = "PING_PERIOD_SECS", default_value_t = 54)]
    pub ping_period_secs: u64,

    /// Timeout of a single write to a client, in seconds
    #[arg(long, env = "WRITE_WAIT_SECS", default_value_t = 10)]
    pub write_wait_secs: u64,

    /// How long shutdown waits for connections to close, in seconds
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 10)]
    pub shutdown_grace_secs: u64,

    /// Comma separated list of origins allowed by CORS
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://127.0.0.1:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// Number of email worker tasks
    #[arg(long, env = "NOTIFICATION_WORKERS", default_value_t = 10)]
    pub notification_workers: usize,

    /// Delivery attempts per email, including the first
    #[arg(long, env = "NOTIFICATION_MAX_ATTEMPTS", default_value_t = 3)]
    pub notification_max_attempts: u32,

    /// Timeout of one delivery attempt, in seconds
    #[arg(long, env = "NOTIFICATION_TIMEOUT_SECS", default_value_t = 30)]
    pub notification_timeout_secs: u64,

    /// Email subscribers of rooms, comma separated `room:user:address` entries.
    /// A subscriber gets an email for each message sent while they are not in the room.
    #[arg(long, env = "SUBSCRIBERS", value_delimiter = ',')]
    pub subscribers: Vec<SubscriptionEntry>,

    /// Messages retained per room by the history store
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = 1000)]
    pub history_capacity: usize,

    /// Log output format: pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Limits applied to every client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_frame_bytes: usize,
    pub pong_wait: Duration,
    pub ping_period: Duration,
    pub write_wait: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: 512,
            pong_wait: Duration::from_secs(60),
            ping_period: Duration::from_secs(54),
            write_wait: Duration::from_secs(10),
        }
    }
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub hub: HubConfig,
    pub session: SessionConfig,
    pub shutdown_grace: Duration,
    pub allowed_origins: Vec<String>,
    pub notification_workers: usize,
    pub retry: RetryPolicy,
    pub history_capacity: usize,
    pub subscribers: Vec<SubscriptionEntry>,
}

impl TryFrom<Args> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let positive = [
            ("outbound_capacity", args.outbound_capacity as u64),
            ("max_frame_bytes", args.max_frame_bytes as u64),
            ("pong_wait_secs", args.pong_wait_secs),
            ("ping_period_secs", args.ping_period_secs),
            ("write_wait_secs", args.write_wait_secs),
            ("shutdown_grace_secs", args.shutdown_grace_secs),
            ("notification_workers", args.notification_workers as u64),
            ("notification_max_attempts", u64::from(args.notification_max_attempts)),
            ("notification_timeout_secs", args.notification_timeout_secs),
            ("history_capacity", args.history_capacity as u64),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(*name));
        }
        if args.ping_period_secs >= args.pong_wait_secs {
            return Err(ConfigError::PingNotBeforePong {
                ping: args.ping_period_secs,
                pong: args.pong_wait_secs,
            });
        }

        let allowed_origins: Vec<String> = args
            .allowed_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if allowed_origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            hub: HubConfig {
                outbound_capacity: args.outbound_capacity,
                ..HubConfig::default()
            },
            session: SessionConfig {
                max_frame_bytes: args.max_frame_bytes,
                pong_wait: Duration::from_secs(args.pong_wait_secs),
                ping_period: Duration::from_secs(args.ping_period_secs),
                write_wait: Duration::from_secs(args.write_wait_secs),
            },
            shutdown_grace: Duration::from_secs(args.shutdown_grace_secs),
            allowed_origins,
            notification_workers: args.notification_workers,
            retry: RetryPolicy {
                max_attempts: args.notification_max_attempts,
                attempt_timeout: Duration::from_secs(args.notification_timeout_secs),
                ..RetryPolicy::default()
            },
            history_capacity: args.history_capacity,
            subscribers: args.subscribers,
        })
    }
}
