//! # Till Demo Entry Point
//!
//! Usage: `till-demo [config.toml]`. Logs go to stderr, the receipt to stdout.

fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = till_demo::run() {
        eprintln!("till-demo: {}", e);
        std::process::exit(1);
    }
}
