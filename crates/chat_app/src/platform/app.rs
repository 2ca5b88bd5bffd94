use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chat_core::{update, AppState, Msg, TOOL_NAME};
use chat_logging::{chat_info, chat_warn};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui;

pub fn run_app() -> io::Result<()> {
    logging::initialize(LogDestination::File);

    let config_dir = std::env::current_dir()?;
    let settings = persistence::load_settings(&config_dir);
    let tool_config = persistence::ensure_tool_config(&config_dir);
    if !tool_config.is_enabled() {
        chat_info!("tool '{TOOL_NAME}' is disabled in the admin config");
    }

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&settings, msg_tx.clone()).map_err(io::Error::other)?;

    let quit = Arc::new(AtomicBool::new(false));
    spawn_input_thread(msg_tx.clone(), quit.clone());
    spawn_tick_thread(msg_tx);

    let mut state = AppState::new();
    println!("{}", ui::render::greeting());
    print_prompt()?;

    while let Ok(msg) = msg_rx.recv() {
        if quit.load(Ordering::SeqCst) {
            break;
        }
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.run(effects);
        if state.consume_dirty() {
            println!("{}", ui::render::render(&state.view()));
            print_prompt()?;
        }
    }

    chat_info!("chat view shutting down");
    Ok(())
}

fn spawn_input_thread(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    chat_warn!("stdin read failed: {err}");
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed == "/quit" {
                break;
            }
            let Some(msg) = parse_line(trimmed) else {
                continue;
            };
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
        // Quit command or end of input: wake the loop so it can exit.
        quit.store(true, Ordering::SeqCst);
        let _ = msg_tx.send(Msg::NoOp);
    });
}

/// Maps a terminal line onto the chat surface: slash commands drive the
/// events panel, anything else is a chat message.
fn parse_line(trimmed: &str) -> Option<Msg> {
    match trimmed {
        "" => None,
        "/events" => Some(Msg::PanelToggled),
        "/download" => Some(Msg::DownloadClicked),
        _ => Some(Msg::UserMessageSubmitted(trimmed.to_string())),
    }
}

// Background tick to throttle rendering and UI updates.
fn spawn_tick_thread(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}

fn print_prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
