//! Utilities shared by the Hiroma server and client binaries.

pub mod logger;
pub mod time;
