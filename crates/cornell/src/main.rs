//! # Cornell CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/cornellapp/`: Core library with UI-agnostic reading logic
//! - `crates/cornell/`: This CLI tool, depends on the `cornellapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/cornell/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Command handlers + context wiring (commands.rs)          │
//! │  - Colored terminal output (print.rs)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/cornellapp/src/api.rs)                   │
//! │  - One reading session + its action menu                    │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A terminal has no pointer, so every command replays what a reader would do
//! on screen: open the document, go to a stage, select some text, pick a menu
//! action, then save.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
