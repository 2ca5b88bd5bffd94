//! Chat engine: effect execution for the chat frontend. Hosts the event-store
//! client, the interval poller and the chat-backend client on a dedicated
//! runtime thread.
mod backend;
mod engine;
mod poller;
mod store;
mod types;

pub use backend::{BackendError, ChatBackend, HttpChatBackend, OutgoingMessage, WireRole};
pub use engine::EngineHandle;
pub use poller::PollerSettings;
pub use store::{EventStore, HttpEventStore, StoreSettings};
pub use types::{EngineEvent, Generation, StoreError, StoreEvent};
