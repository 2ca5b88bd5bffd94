//! Chat core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod tool_config;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, EventRecord, Generation, MessageEntry, Role};
pub use tool_config::{EmptyConfig, ToolConfig, ToolConfigError, TOOL_NAME};
pub use update::update;
pub use view_model::{
    AppViewModel, DownloadView, EventRowView, MessageView, PanelViewModel, HIDE_EVENTS_LABEL,
    RESULT_FILE_NAME, SHOW_EVENTS_LABEL,
};
