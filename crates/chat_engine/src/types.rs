use thiserror::Error;

/// Monotonic id of a polling session, assigned by the caller. Every event a
/// session emits carries its generation so late arrivals can be dropped.
pub type Generation = u64;

/// One status record read from the backing collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub text: String,
    pub file_url: Option<String>,
}

/// Events emitted by the engine thread towards the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Latest record observed by the active polling session.
    EventFetched {
        generation: Generation,
        title: String,
        file_url: Option<String>,
    },
    /// A poll attempt failed; the next attempt happens on the regular tick.
    PollFailed {
        generation: Generation,
        message: String,
    },
    /// The chat backend produced the assistant reply.
    ChatCompleted { content: String },
    /// The chat request failed.
    ChatFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing collection has not been created yet. Not a failure: the
    /// pipeline simply has not started writing.
    #[error("backing collection does not exist")]
    CollectionMissing,
    #[error("store returned http status {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected store response: {0}")]
    Decode(String),
}
