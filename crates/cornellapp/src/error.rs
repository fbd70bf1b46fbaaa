use crate::menu::MenuAction;
use crate::model::DocumentId;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CornellError {
    #[error("Failed to fetch: {0}")]
    Fetch(String),

    #[error("No stages found for document {0}")]
    EmptyResult(DocumentId),

    #[error("Failed to save notes: {0}")]
    Persist(String),

    #[error("Could not decode field `{field}`: {message}")]
    Parse { field: &'static str, message: String },

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Stage {index} is out of range (document has {len} stages)")]
    StageOutOfRange { index: usize, len: usize },

    #[error("No active stage")]
    NoActiveStage,

    #[error("Action {0:?} is not available for the current selection")]
    IllegalAction(MenuAction),

    #[error("Sticker not found: {0}")]
    StickerNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CornellError>;
