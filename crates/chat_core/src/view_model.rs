use crate::Role;

/// Toggle label while the panel is collapsed.
pub const SHOW_EVENTS_LABEL: &str = "Show events";
/// Toggle label while the panel is expanded.
pub const HIDE_EVENTS_LABEL: &str = "Hide events";
/// Suggested filename for the downloadable report artifact.
pub const RESULT_FILE_NAME: &str = "Results-LLM.xlsx";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub messages: Vec<MessageView>,
    pub awaiting_response: bool,
    pub send_error: Option<String>,
    /// `None` once the pending cycle's artifact has been claimed.
    pub panel: Option<PanelViewModel>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelViewModel {
    pub open: bool,
    pub busy: bool,
    pub toggle_label: &'static str,
    pub rows: Vec<EventRowView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRowView {
    pub title: String,
    pub download: Option<DownloadView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadView {
    pub href: String,
    pub file_name: &'static str,
}
