use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UserMessageSubmitted(raw) => {
            let content = raw.trim();
            if content.is_empty() || state.is_awaiting_response() {
                return (state, Vec::new());
            }
            state.push_user_message(content.to_owned());
            let mut effects = vec![Effect::SendChat {
                messages: state.messages().to_vec(),
            }];
            effects.extend(sync_polling(&mut state));
            effects
        }
        Msg::AssistantMessageReceived(content) => {
            state.push_assistant_message(content);
            sync_polling(&mut state)
        }
        Msg::SendFailed(message) => {
            state.record_send_failure(message);
            sync_polling(&mut state)
        }
        Msg::EventFetched {
            generation,
            title,
            file_url,
        } => {
            state.apply_event(generation, title, file_url);
            Vec::new()
        }
        Msg::PollFailed {
            generation,
            message,
        } => {
            state.apply_poll_error(generation, message);
            Vec::new()
        }
        Msg::PanelToggled => {
            state.toggle_panel();
            Vec::new()
        }
        Msg::DownloadClicked => {
            state.acknowledge_download();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Reconciles the polling session with the derived `should_poll` condition.
/// At most one session is active at a time; starting a new one clears the
/// event log for the new pending cycle.
fn sync_polling(state: &mut AppState) -> Vec<Effect> {
    match (state.should_poll(), state.is_polling()) {
        (true, false) => {
            let generation = state.begin_polling();
            vec![Effect::StartPolling { generation }]
        }
        (false, true) => {
            state.end_polling();
            vec![Effect::StopPolling]
        }
        _ => Vec::new(),
    }
}
