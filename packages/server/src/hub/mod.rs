//! The connection hub.
//!
//! A single event-loop task ([`Hub`]) owns the [`RoomRegistry`] and is the only
//! code that mutates it. Sessions talk to it exclusively through a cloneable
//! [`HubHandle`]; HTTP handlers read copies published to a [`RegistryView`].
//!
//! ```text
//! session ──join/leave/message──▶ HubHandle ──mpsc──▶ Hub (registry owner)
//!                                                      │
//!                        presence snapshot ◀───────────┤
//!                        broadcaster ──try_send──▶ member outbound buffers
//!                        RegistryView ◀── publish ─────┘
//! ```

mod broadcaster;
mod error;
mod event;
mod handle;
mod persistence;
pub mod presence;
mod registry;
mod runner;
mod view;

pub use broadcaster::broadcast;
pub use error::HubError;
pub use event::{ClientHandle, Departure, HubEvent, InboundMessage, OutboundReceiver, OutboundSender};
pub use handle::{HubHandle, Registration};
pub use persistence::{DEFAULT_PERSIST_CAPACITY, Persister};
pub use registry::{Removal, Room, RoomRegistry, UpsertOutcome};
pub use runner::{Hub, HubConfig, HubDeps};
pub use view::{RegistryView, RoomSnapshot};
