use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use chat_logging::{chat_debug, chat_info, chat_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::store::EventStore;
use crate::{EngineEvent, Generation, StoreError, StoreEvent};

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
    /// Name of the backing collection the pipeline writes status records to.
    pub collection: String,
    /// Record text signaling pipeline completion.
    pub terminal_text: String,
    /// Delete the backing collection after the terminal record is observed.
    pub cleanup_on_terminal: bool,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            collection: "events".to_string(),
            terminal_text: "Results-LLM.xlsx".to_string(),
            cleanup_on_terminal: true,
        }
    }
}

/// One polling session: reads the latest record every tick until cancelled.
/// Emitted events carry the session's generation; the token is re-checked
/// after every await so a cancelled session never emits a stale result.
pub(crate) async fn poll_loop(
    store: Arc<dyn EventStore>,
    settings: PollerSettings,
    generation: Generation,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cleanup_done = false;

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        match poll_once(store.as_ref(), &settings, &mut cleanup_done).await {
            Ok(Some(event)) => {
                if token.is_cancelled() {
                    return;
                }
                let StoreEvent { text, file_url } = event;
                let _ = event_tx.send(EngineEvent::EventFetched {
                    generation,
                    title: text,
                    file_url,
                });
            }
            Ok(None) => {}
            Err(StoreError::CollectionMissing) => {
                // The pipeline has not started writing yet.
                chat_debug!("collection '{}' does not exist yet", settings.collection);
            }
            Err(err) => {
                if token.is_cancelled() {
                    return;
                }
                chat_warn!("status fetch failed: {err}");
                let _ = event_tx.send(EngineEvent::PollFailed {
                    generation,
                    message: err.to_string(),
                });
            }
        }
    }
}

async fn poll_once(
    store: &dyn EventStore,
    settings: &PollerSettings,
    cleanup_done: &mut bool,
) -> Result<Option<StoreEvent>, StoreError> {
    if !store.collection_exists(&settings.collection).await? {
        return Ok(None);
    }
    let Some(event) = store.latest_event(&settings.collection).await? else {
        return Ok(None);
    };

    if settings.cleanup_on_terminal && !*cleanup_done && event.text == settings.terminal_text {
        // Later ticks may still observe the stale terminal record until the
        // deletion lands; run the cleanup once per session.
        *cleanup_done = true;
        match store.delete_collection(&settings.collection).await {
            Ok(()) => {
                chat_info!(
                    "collection '{}' deleted after terminal record",
                    settings.collection
                );
            }
            Err(err) => {
                chat_warn!("cleanup of collection '{}' failed: {err}", settings.collection);
            }
        }
    }

    Ok(Some(event))
}
