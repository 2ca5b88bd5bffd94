mod platform;

fn main() {
    if let Err(err) = platform::run_app() {
        eprintln!("chat_app failed: {err}");
        std::process::exit(1);
    }
}
