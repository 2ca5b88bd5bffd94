use std::sync::{mpsc, Arc};
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::backend::{ChatBackend, OutgoingMessage};
use crate::poller::{poll_loop, PollerSettings};
use crate::store::EventStore;
use crate::{EngineEvent, Generation};

enum EngineCommand {
    StartPolling { generation: Generation },
    StopPolling,
    SendChat { messages: Vec<OutgoingMessage> },
}

/// Handle to the engine thread. Commands are fire-and-forget; results come
/// back through the event channel handed to [`EngineHandle::new`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        store: Arc<dyn EventStore>,
        backend: Arc<dyn ChatBackend>,
        settings: PollerSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // Invariant: at most one polling session is live; starting a new
            // one cancels the previous token first.
            let mut active: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { generation } => {
                        if let Some(token) = active.take() {
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        active = Some(token.clone());
                        runtime.spawn(poll_loop(
                            store.clone(),
                            settings.clone(),
                            generation,
                            token,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::StopPolling => {
                        if let Some(token) = active.take() {
                            token.cancel();
                        }
                    }
                    EngineCommand::SendChat { messages } => {
                        let backend = backend.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = match backend.complete(&messages).await {
                                Ok(content) => EngineEvent::ChatCompleted { content },
                                Err(err) => EngineEvent::ChatFailed {
                                    message: err.to_string(),
                                },
                            };
                            let _ = event_tx.send(event);
                        });
                    }
                }
            }

            // All handles dropped: tear the session down with the thread.
            if let Some(token) = active.take() {
                token.cancel();
            }
        });

        Self { cmd_tx }
    }

    pub fn start_polling(&self, generation: Generation) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { generation });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn send_chat(&self, messages: Vec<OutgoingMessage>) {
        let _ = self.cmd_tx.send(EngineCommand::SendChat { messages });
    }
}
