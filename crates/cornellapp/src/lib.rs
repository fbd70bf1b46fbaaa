//! # Cornell Architecture
//!
//! Cornell is a **UI-agnostic reading library**. A document is read stage by
//! stage; while reading, the user highlights passages and attaches Cornell-style
//! stickers (cues on the left, notes on the right, a summary at the bottom).
//! The terminal client in `crates/cornell` is just one way to drive it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (crates/cornell)                                    │
//! │  - Parses arguments, draws stages, prompts, exit codes      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One session + one action menu                            │
//! │  - Returns CmdResult values with leveled messages           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Reading Core                                               │
//! │  - session.rs: stage loading, fallback, navigation, saves   │
//! │  - annotations.rs / menu.rs / selection.rs: editing         │
//! │  - render.rs: text runs with highlights marked              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, wire.rs)                            │
//! │  - DocumentSource trait                                     │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain Rust values and returns plain Rust
//! types. It never prints, never exits the process and never asks the user
//! anything directly: confirmation goes through the [`annotations::Confirm`]
//! hook, selections arrive through [`selection::SelectionSource`].
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`session`]: Stage loading, raw-text fallback, active stage, persistence
//! - [`annotations`]: Stickers, highlights and summary of the active stage
//! - [`menu`]: The action menu over a selection
//! - [`selection`]: Turning pointer events into selections
//! - [`render`]: Splitting stage text into highlighted and plain runs
//! - [`store`]: Storage abstraction and implementations
//! - [`wire`]: Persisted note format
//! - [`model`]: Core data types
//! - [`config`]: Configuration management
//! - [`init`]: Data directory and config resolution
//! - [`error`]: Error types

pub mod annotations;
pub mod api;
pub mod config;
pub mod error;
pub mod init;
pub mod menu;
pub mod model;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;
pub mod wire;
