use std::error::Error;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chat_core::{Effect, MessageEntry, Msg, Role};
use chat_engine::{
    EngineEvent, EngineHandle, HttpChatBackend, HttpEventStore, OutgoingMessage, PollerSettings,
    StoreSettings, WireRole,
};
use chat_logging::{chat_info, chat_warn};

use super::persistence::AppSettings;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: &AppSettings,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let store = HttpEventStore::new(StoreSettings {
            base_url: settings.store_url.clone(),
            api_key: settings.store_api_key.clone(),
            ..StoreSettings::default()
        })?;
        let backend = HttpChatBackend::new(
            settings.backend_url.clone(),
            Duration::from_secs(5),
            Duration::from_secs(120),
        )?;
        let poller = PollerSettings {
            interval: Duration::from_millis(settings.poll_interval_ms),
            collection: settings.collection.clone(),
            ..PollerSettings::default()
        };

        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::new(Arc::new(store), Arc::new(backend), poller, event_tx);
        spawn_event_pump(event_rx, msg_tx);

        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { generation } => {
                    chat_info!("polling session {generation} started");
                    self.engine.start_polling(generation);
                }
                Effect::StopPolling => {
                    chat_info!("polling session stopped");
                    self.engine.stop_polling();
                }
                Effect::SendChat { messages } => {
                    self.engine.send_chat(map_messages(&messages));
                }
            }
        }
    }
}

fn spawn_event_pump(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::EventFetched {
                    generation,
                    title,
                    file_url,
                } => Msg::EventFetched {
                    generation,
                    title,
                    file_url,
                },
                EngineEvent::PollFailed {
                    generation,
                    message,
                } => Msg::PollFailed {
                    generation,
                    message,
                },
                EngineEvent::ChatCompleted { content } => Msg::AssistantMessageReceived(content),
                EngineEvent::ChatFailed { message } => {
                    chat_warn!("chat request failed: {message}");
                    Msg::SendFailed(message)
                }
            };
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
    });
}

fn map_messages(messages: &[MessageEntry]) -> Vec<OutgoingMessage> {
    messages
        .iter()
        .map(|entry| OutgoingMessage {
            role: match entry.role {
                Role::User => WireRole::User,
                Role::Assistant => WireRole::Assistant,
            },
            content: entry.content.clone(),
        })
        .collect()
}
