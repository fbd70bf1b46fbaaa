//! # Persisted Note Format
//!
//! This is the only place that knows how an [`AnnotationRecord`] looks once it
//! leaves the process. The record maps onto four fields:
//!
//! | Field | Stored as |
//! |-------|-----------|
//! | `cues_stickers` | JSON array of stickers, encoded as a string |
//! | `notes_stickers` | JSON array of stickers, encoded as a string |
//! | `highlights` | JSON array of highlights, encoded as a string |
//! | `summary_bottom` | plain text |
//!
//! Older writers stored the arrays inline instead of as strings, and some
//! records carry `null` or nothing at all. Decoding therefore classifies each
//! array field first and only then parses it. A field that cannot be decoded
//! becomes an empty collection on its own: the rest of the record still loads.
//!
//! Inside the crate every record is strongly typed; none of this leaks past
//! `From<PersistedNote>`.

use crate::error::{CornellError, Result};
use crate::model::AnnotationRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedNote {
    #[serde(default)]
    pub cues_stickers: Value,
    #[serde(default)]
    pub notes_stickers: Value,
    #[serde(default)]
    pub highlights: Value,
    #[serde(default)]
    pub summary_bottom: Option<String>,
}

impl From<AnnotationRecord> for PersistedNote {
    fn from(record: AnnotationRecord) -> Self {
        Self {
            cues_stickers: encode_array(&record.cue_stickers),
            notes_stickers: encode_array(&record.note_stickers),
            highlights: encode_array(&record.highlights),
            summary_bottom: Some(record.summary),
        }
    }
}

impl From<PersistedNote> for AnnotationRecord {
    fn from(note: PersistedNote) -> Self {
        Self {
            cue_stickers: decode_lenient("cues_stickers", note.cues_stickers),
            note_stickers: decode_lenient("notes_stickers", note.notes_stickers),
            highlights: decode_lenient("highlights", note.highlights),
            summary: note.summary_bottom.unwrap_or_default(),
        }
    }
}

fn encode_array<T: Serialize>(items: &[T]) -> Value {
    Value::String(serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string()))
}

/// Decode one array field, reporting why it failed.
pub fn decode_array<T: DeserializeOwned>(field: &'static str, value: Value) -> Result<Vec<T>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::String(text) if text.trim().is_empty() => return Ok(Vec::new()),
        Value::String(text) => serde_json::from_str::<Value>(&text).map_err(|e| {
            CornellError::Parse {
                field,
                message: e.to_string(),
            }
        })?,
        other => other,
    };

    match items {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(items).map_err(|e| CornellError::Parse {
            field,
            message: e.to_string(),
        }),
        other => Err(CornellError::Parse {
            field,
            message: format!("expected an array, found {}", kind_of(&other)),
        }),
    }
}

fn decode_lenient<T: DeserializeOwned>(field: &'static str, value: Value) -> Vec<T> {
    decode_array(field, value).unwrap_or_else(|err| {
        log::warn!("{}; substituting an empty collection", err);
        Vec::new()
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
