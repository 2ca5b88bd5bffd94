use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex, Once};
use std::thread;
use std::time::Duration;

use chat_engine::{
    BackendError, ChatBackend, EngineEvent, EngineHandle, EventStore, OutgoingMessage,
    PollerSettings, StoreError, StoreEvent,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

/// In-memory store substitute with call counters.
struct ScriptedStore {
    exists: AtomicBool,
    latest: Mutex<Option<StoreEvent>>,
    exists_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl ScriptedStore {
    fn new(exists: bool, latest: Option<StoreEvent>) -> Arc<Self> {
        Arc::new(Self {
            exists: AtomicBool::new(exists),
            latest: Mutex::new(latest),
            exists_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        })
    }

    fn set_latest(&self, event: Option<StoreEvent>) {
        *self.latest.lock().unwrap() = event;
    }
}

#[async_trait::async_trait]
impl EventStore for ScriptedStore {
    async fn collection_exists(&self, _collection: &str) -> Result<bool, StoreError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.exists.load(Ordering::SeqCst))
    }

    async fn latest_event(&self, _collection: &str) -> Result<Option<StoreEvent>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.latest.lock().unwrap().clone())
    }

    async fn delete_collection(&self, _collection: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.exists.store(false, Ordering::SeqCst);
        Ok(())
    }
}

struct NullBackend;

#[async_trait::async_trait]
impl ChatBackend for NullBackend {
    async fn complete(&self, _messages: &[OutgoingMessage]) -> Result<String, BackendError> {
        Ok(String::new())
    }
}

fn fast_settings() -> PollerSettings {
    PollerSettings {
        interval: Duration::from_millis(10),
        ..PollerSettings::default()
    }
}

fn engine_for(store: Arc<ScriptedStore>) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::new(store, Arc::new(NullBackend), fast_settings(), event_tx);
    (engine, event_rx)
}

fn drain(event_rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    events
}

fn record(text: &str) -> StoreEvent {
    StoreEvent {
        text: text.to_string(),
        file_url: None,
    }
}

#[test]
fn emits_latest_record_with_session_generation() {
    init_logging();
    let store = ScriptedStore::new(true, Some(record("Start reasoning")));
    let (engine, event_rx) = engine_for(store);

    engine.start_polling(3);
    thread::sleep(Duration::from_millis(100));

    let events = drain(&event_rx);
    assert!(!events.is_empty());
    assert!(events.iter().all(|event| matches!(
        event,
        EngineEvent::EventFetched { generation: 3, title, .. } if title == "Start reasoning"
    )));
}

#[test]
fn missing_collection_is_skipped_silently() {
    init_logging();
    let store = ScriptedStore::new(false, None);
    let (engine, event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(100));

    assert!(drain(&event_rx).is_empty());
    assert!(store.exists_calls.load(Ordering::SeqCst) > 0);
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn stop_halts_fetching() {
    init_logging();
    let store = ScriptedStore::new(true, Some(record("working")));
    let (engine, event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(80));
    engine.stop_polling();

    // Let the cancellation land and any in-flight tick settle.
    thread::sleep(Duration::from_millis(50));
    drain(&event_rx);
    let fetches_after_stop = store.fetch_calls.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(100));
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), fetches_after_stop);
    assert!(drain(&event_rx).is_empty());
}

#[test]
fn terminal_record_triggers_cleanup_once() {
    init_logging();
    let store = ScriptedStore::new(
        true,
        Some(StoreEvent {
            text: "Results-LLM.xlsx".to_string(),
            file_url: Some("/api/chat/download".to_string()),
        }),
    );
    let (engine, _event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(150));

    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn stale_terminal_record_does_not_retrigger_cleanup() {
    init_logging();
    let store = ScriptedStore::new(true, Some(record("Results-LLM.xlsx")));
    let (engine, _event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(50));
    // The deletion "failed" upstream: the stale record is still there.
    store.exists.store(true, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(100));

    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn restart_replaces_the_active_session() {
    init_logging();
    let store = ScriptedStore::new(true, Some(record("first cycle")));
    let (engine, event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(60));

    store.set_latest(Some(record("second cycle")));
    engine.start_polling(2);
    thread::sleep(Duration::from_millis(50));
    drain(&event_rx);

    thread::sleep(Duration::from_millis(80));
    let late_events = drain(&event_rx);
    assert!(!late_events.is_empty());
    assert!(late_events.iter().all(|event| matches!(
        event,
        EngineEvent::EventFetched { generation: 2, .. }
    )));
}

#[test]
fn dropping_the_handle_tears_the_session_down() {
    init_logging();
    let store = ScriptedStore::new(true, Some(record("working")));
    let (engine, event_rx) = engine_for(store.clone());

    engine.start_polling(1);
    thread::sleep(Duration::from_millis(60));
    drop(engine);

    thread::sleep(Duration::from_millis(50));
    drain(&event_rx);
    let fetches_after_drop = store.fetch_calls.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(100));
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), fetches_after_drop);
}
