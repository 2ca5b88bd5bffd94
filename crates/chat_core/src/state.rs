use crate::view_model::{
    AppViewModel, DownloadView, EventRowView, MessageView, PanelViewModel, HIDE_EVENTS_LABEL,
    RESULT_FILE_NAME, SHOW_EVENTS_LABEL,
};

/// Monotonic id of a polling session. Results carrying a stale generation
/// are discarded instead of being applied to the event log.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub role: Role,
    pub content: String,
}

/// One status update surfaced by the backend pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub title: String,
    pub is_collapsed: bool,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    messages: Vec<MessageEntry>,
    awaiting_response: bool,
    send_error: Option<String>,
    events: Vec<EventRecord>,
    events_loading: bool,
    poll_error: Option<String>,
    polling: bool,
    poll_generation: Generation,
    panel_open: bool,
    download_acknowledged: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a response is pending and the most recent message is not
    /// yet from the assistant. This is the only condition under which the
    /// event store is polled.
    pub fn should_poll(&self) -> bool {
        self.awaiting_response && !self.last_message_is_from_assistant()
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn generation(&self) -> Generation {
        self.poll_generation
    }

    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    fn last_message_is_from_assistant(&self) -> bool {
        matches!(
            self.messages.last(),
            Some(MessageEntry {
                role: Role::Assistant,
                ..
            })
        )
    }

    pub(crate) fn push_user_message(&mut self, content: String) {
        self.messages.push(MessageEntry {
            role: Role::User,
            content,
        });
        self.awaiting_response = true;
        self.send_error = None;
        self.dirty = true;
    }

    pub(crate) fn push_assistant_message(&mut self, content: String) {
        self.messages.push(MessageEntry {
            role: Role::Assistant,
            content,
        });
        self.awaiting_response = false;
        self.dirty = true;
    }

    pub(crate) fn record_send_failure(&mut self, message: String) {
        self.awaiting_response = false;
        self.send_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Starts a new polling session: the event log is scoped to one pending
    /// cycle, so the log and the panel's download state reset here.
    pub(crate) fn begin_polling(&mut self) -> Generation {
        self.poll_generation += 1;
        self.polling = true;
        self.events_loading = true;
        self.events.clear();
        self.poll_error = None;
        self.panel_open = false;
        self.download_acknowledged = false;
        self.dirty = true;
        self.poll_generation
    }

    pub(crate) fn end_polling(&mut self) {
        self.polling = false;
        self.events_loading = false;
        self.dirty = true;
    }

    /// Folds a fetched record into the event log. Stale results (wrong
    /// generation, or arriving after polling stopped) are dropped, as are
    /// consecutive duplicates of the last appended title.
    pub(crate) fn apply_event(
        &mut self,
        generation: Generation,
        title: String,
        file_url: Option<String>,
    ) {
        if !self.polling || generation != self.poll_generation {
            return;
        }
        if self
            .events
            .last()
            .is_some_and(|last| last.title == title)
        {
            return;
        }
        let has_file = file_url.is_some();
        self.events.push(EventRecord {
            title,
            is_collapsed: false,
            file_url,
        });
        if has_file && !self.download_acknowledged {
            self.panel_open = true;
        }
        self.dirty = true;
    }

    pub(crate) fn apply_poll_error(&mut self, generation: Generation, message: String) {
        if !self.polling || generation != self.poll_generation {
            return;
        }
        self.poll_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
        self.dirty = true;
    }

    pub(crate) fn acknowledge_download(&mut self) {
        self.download_acknowledged = true;
        self.dirty = true;
    }

    /// The panel keeps rendering until the current cycle's artifact has been
    /// claimed; a new pending cycle brings it back.
    fn panel_visible(&self) -> bool {
        self.should_poll() || !self.download_acknowledged
    }

    pub fn view(&self) -> AppViewModel {
        let panel = self.panel_visible().then(|| PanelViewModel {
            open: self.panel_open,
            busy: self.events_loading,
            toggle_label: if self.panel_open {
                HIDE_EVENTS_LABEL
            } else {
                SHOW_EVENTS_LABEL
            },
            rows: self
                .events
                .iter()
                .map(|record| EventRowView {
                    title: record.title.clone(),
                    download: record.file_url.as_ref().map(|url| DownloadView {
                        href: url.clone(),
                        file_name: RESULT_FILE_NAME,
                    }),
                })
                .collect(),
            error: self.poll_error.clone(),
        });

        AppViewModel {
            messages: self
                .messages
                .iter()
                .map(|entry| MessageView {
                    role: entry.role,
                    content: entry.content.clone(),
                })
                .collect(),
            awaiting_response: self.awaiting_response,
            send_error: self.send_error.clone(),
            panel,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }
}
