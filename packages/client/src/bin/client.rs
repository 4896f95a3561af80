//! Terminal chat client for Hiroma rooms.
//!
//! Connects to `/ws/{room}/{user}`, prints presence and chat events and sends
//! each input line as a chat message. Reconnects after a lost connection
//! (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-client -- --room lobby --user-id alice --username Alice
//! cargo run --bin hiroma-client -- -r lobby -i bob
//! ```

use clap::Parser;

use hiroma_client::{ClientOptions, DEFAULT_MAX_FRAME_BYTES, run_client};
use hiroma_shared::logger::{LogFormat, setup_logger};

#[derive(Parser, Debug)]
#[command(name = "hiroma-client")]
#[command(about = "Terminal client for Hiroma chat rooms", long_about = None)]
struct Args {
    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// User ID within the room
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name (the server uses "Anonymous" when omitted)
    #[arg(short = 'n', long)]
    username: Option<String>,

    /// WebSocket base URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Largest frame the server accepts, in bytes (must match the server's MAX_FRAME_BYTES)
    #[arg(long, env = "MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    max_frame_bytes: usize,

    /// Log output format (pretty or json)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info", args.log_format);

    let options = ClientOptions {
        url: args.url,
        room_id: args.room,
        user_id: args.user_id,
        username: args.username,
        max_frame_bytes: args.max_frame_bytes,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
