//! Room-based WebSocket chat relay.
//!
//! Clients attach to a room over a WebSocket, send chat messages and receive
//! everyone else's messages plus join/leave presence updates. The [`hub`]
//! module is the single authority over room membership and fan-out; the other
//! layers wrap it.

// layers
pub mod config;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
