//! # CLI Behavior
//!
//! This is **one possible UI client** for cornell, not the application itself.
//! It is the only place that knows about terminal I/O, exit codes, and output
//! formatting.
//!
//! ## Stages on the Command Line
//!
//! Stages are addressed by their 1-based position with `-s N`. Commands that
//! change annotations go to that stage first and save it before exiting, so
//! every invocation leaves the data directory consistent.
//!
//! ## Documents Without a Plan
//!
//! A document imported without stages is read as a single stage holding the
//! raw text. When even that is missing, `read` prints the session's
//! diagnostic log instead.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print results
//! - `print`: Output formatting (stage text, stickers, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
