//! InMemory 実装

mod message;

pub use message::InMemoryMessageStore;
