//! # Configuration
//!
//! Configuration is managed by [`clapfig`], which layers a `cornell.toml`
//! found in the data directory over the compiled defaults declared here with
//! `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `confirm_deletes` | `true` | Ask before deleting a sticker |
//! | `delete_prompt` | `Delete this note?` | Text of the delete confirmation |
//! | `fallback_title` | `Full Document (Raw)` | Title of the raw-text stage |
//! | `fallback_objective` | `Read the full document.` | Objective of the raw-text stage |

use crate::annotations::DEFAULT_DELETE_PROMPT;
use crate::session::{DEFAULT_FALLBACK_OBJECTIVE, DEFAULT_FALLBACK_TITLE};
use confique::Config;
use serde::{Deserialize, Serialize};

/// Configuration for cornell, stored in `cornell.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CornellConfig {
    /// Ask for confirmation before a sticker is deleted.
    #[config(default = true)]
    pub confirm_deletes: bool,

    /// Prompt shown when confirming a sticker deletion.
    #[config(default = "Delete this note?")]
    pub delete_prompt: String,

    /// Title given to the stage built from raw text when a document has no plan.
    #[config(default = "Full Document (Raw)")]
    pub fallback_title: String,

    /// Objective given to that same stage.
    #[config(default = "Read the full document.")]
    pub fallback_objective: String,
}

impl Default for CornellConfig {
    fn default() -> Self {
        Self {
            confirm_deletes: true,
            delete_prompt: DEFAULT_DELETE_PROMPT.to_string(),
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            fallback_objective: DEFAULT_FALLBACK_OBJECTIVE.to_string(),
        }
    }
}
