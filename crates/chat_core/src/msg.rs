#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a chat message from the input box.
    UserMessageSubmitted(String),
    /// Assistant reply arrived from the chat backend.
    AssistantMessageReceived(String),
    /// The chat backend rejected or failed the pending request.
    SendFailed(String),
    /// Poller observed the latest status record in the backing collection.
    EventFetched {
        generation: crate::Generation,
        title: String,
        file_url: Option<String>,
    },
    /// A poll attempt failed; the next attempt happens on the regular tick.
    PollFailed {
        generation: crate::Generation,
        message: String,
    },
    /// User toggled the events panel open or closed.
    PanelToggled,
    /// User activated the download affordance on a completed artifact.
    DownloadClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
