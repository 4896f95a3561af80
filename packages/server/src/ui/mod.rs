//! HTTP and WebSocket surface of the chat relay.

mod handler;
mod server;
mod session;
pub mod signal;
pub mod state;

pub use server::Server;
