use clap::{Parser, Subcommand};
use cornellapp::model::{DocumentId, StickerKind};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "cornell",
    bin_name = "cornell",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Read documents stage by stage, with highlights and Cornell notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $CORNELL_DATA, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a document from a text file, with an optional JSON reading plan
    #[command(display_order = 1)]
    Import {
        doc: DocumentId,

        /// File holding the raw document text
        raw_file: PathBuf,

        /// JSON array of stages
        #[arg(long, value_name = "FILE")]
        stages: Option<PathBuf>,
    },

    /// List the stages of a document
    #[command(alias = "ls", display_order = 2)]
    Stages { doc: DocumentId },

    /// Show a stage with its highlights and notes
    #[command(alias = "r", display_order = 3)]
    Read {
        doc: DocumentId,

        /// Stage number (1-based)
        #[arg(short, long, default_value_t = 1)]
        stage: usize,

        /// Ignore the reading plan and show the raw text
        #[arg(long)]
        raw: bool,
    },

    /// Highlight every occurrence of some text
    #[command(alias = "hl", display_order = 10)]
    Highlight {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove a highlight
    #[command(display_order = 11)]
    Unhighlight {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Add a cue (question) sticker
    #[command(display_order = 12)]
    Cue {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        /// Attach the sticker to this passage
        #[arg(long, value_name = "TEXT")]
        on: Option<String>,
    },

    /// Add a note sticker
    #[command(display_order = 13)]
    Note {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        /// Attach the sticker to this passage
        #[arg(long, value_name = "TEXT")]
        on: Option<String>,
    },

    /// Replace the content of a sticker
    #[command(display_order = 14)]
    Edit {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        /// cue or note
        kind: StickerKind,

        id: Uuid,

        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Delete a sticker
    #[command(alias = "rm", display_order = 15)]
    Delete {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        /// cue or note
        kind: StickerKind,

        id: Uuid,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Set the summary of a stage
    #[command(display_order = 16)]
    Summary {
        doc: DocumentId,

        #[arg(short, long)]
        stage: usize,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Totals and every saved note of a document
    #[command(display_order = 20)]
    Report { doc: DocumentId },
}
