//! Terminal client for the Hiroma chat relay.

mod domain;
mod formatter;
mod runner;
mod session;
mod ui;

pub mod error;

pub use domain::DEFAULT_MAX_FRAME_BYTES;
pub use runner::{ClientOptions, run_client};
