#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Begin a polling session against the event store. The generation tags
    /// every result of the session so stale ones can be dropped.
    StartPolling { generation: crate::Generation },
    /// Cancel the active polling session.
    StopPolling,
    /// Send the chat history to the backend for completion.
    SendChat { messages: Vec<crate::MessageEntry> },
}
