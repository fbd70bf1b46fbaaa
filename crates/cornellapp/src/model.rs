use crate::error::CornellError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DocumentId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub i64);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id given to the stage synthesized from raw document text.
pub const FALLBACK_STAGE_ID: StageId = StageId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    Cue,
    Note,
}

impl StickerKind {
    /// Column heading used by clients.
    pub fn label(&self) -> &'static str {
        match self {
            StickerKind::Cue => "CUES / QUESTIONS",
            StickerKind::Note => "NOTES",
        }
    }
}

impl fmt::Display for StickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StickerKind::Cue => write!(f, "cue"),
            StickerKind::Note => write!(f, "note"),
        }
    }
}

impl FromStr for StickerKind {
    type Err = CornellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cue" | "cues" | "question" => Ok(StickerKind::Cue),
            "note" | "notes" => Ok(StickerKind::Note),
            other => Err(CornellError::Store(format!("Unknown sticker kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocab {
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: Uuid,
    pub content: String,
    // Snapshot of the span that prompted the sticker; never changes after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sticker {
    pub fn new(content: String, selected_text: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            selected_text,
            created_at: Utc::now(),
        }
    }
}

/// A content-matched span of stage text.
///
/// Offsets are recorded but advisory: rendering and removal match on `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub start_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
}

impl Highlight {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            start_offset: 0,
            end_offset: 0,
        }
    }
}

/// The persisted bundle of stickers, highlights and summary for one stage.
///
/// Serialization goes through [`crate::wire::PersistedNote`], which owns the
/// on-disk field names and the lenient decoding of legacy values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "crate::wire::PersistedNote", into = "crate::wire::PersistedNote")]
pub struct AnnotationRecord {
    pub cue_stickers: Vec<Sticker>,
    pub note_stickers: Vec<Sticker>,
    pub highlights: Vec<Highlight>,
    pub summary: String,
}

impl AnnotationRecord {
    /// A record with nothing in it means "no notes".
    pub fn is_empty(&self) -> bool {
        self.cue_stickers.is_empty()
            && self.note_stickers.is_empty()
            && self.highlights.is_empty()
            && self.summary.is_empty()
    }

    pub fn stickers(&self, kind: StickerKind) -> &[Sticker] {
        match kind {
            StickerKind::Cue => &self.cue_stickers,
            StickerKind::Note => &self.note_stickers,
        }
    }

    pub(crate) fn stickers_mut(&mut self, kind: StickerKind) -> &mut Vec<Sticker> {
        match kind {
            StickerKind::Cue => &mut self.cue_stickers,
            StickerKind::Note => &mut self.note_stickers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    /// 1-based position in the reading plan. Not validated.
    #[serde(rename = "stage_index")]
    pub index: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub objective: String,
    #[serde(rename = "stage_text")]
    pub text: String,
    #[serde(rename = "suggested_vocab", default)]
    pub suggested_vocabulary: Vec<Vocab>,
    #[serde(
        rename = "cornell_note",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<AnnotationRecord>,
}

impl Stage {
    /// Single stage covering a whole document, used when no reading plan exists.
    pub fn fallback(text: String, title: &str, objective: &str) -> Self {
        Self {
            id: FALLBACK_STAGE_ID,
            index: 1,
            title: title.to_string(),
            objective: objective.to_string(),
            text,
            suggested_vocabulary: Vec::new(),
            note: None,
        }
    }
}

/// Notes of one stage, as listed by the document summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNotes {
    pub stage_id: StageId,
    pub stage_index: u32,
    pub record: AnnotationRecord,
}

/// Read-only aggregate over a document's stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: DocumentId,
    pub total_stages: usize,
    pub total_vocab_suggested: usize,
    pub notes: Vec<StageNotes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_means_no_notes() {
        let mut record = AnnotationRecord::default();
        assert!(record.is_empty());

        record.summary = "done".into();
        assert!(!record.is_empty());
    }

    #[test]
    fn fallback_stage_is_first_and_plain() {
        let stage = Stage::fallback("Lorem ipsum".into(), "Full", "Read it.");
        assert_eq!(stage.index, 1);
        assert_eq!(stage.id, FALLBACK_STAGE_ID);
        assert_eq!(stage.text, "Lorem ipsum");
        assert!(stage.suggested_vocabulary.is_empty());
        assert!(stage.note.is_none());
    }

    #[test]
    fn sticker_kind_parses_aliases() {
        assert_eq!("Cue".parse::<StickerKind>().unwrap(), StickerKind::Cue);
        assert_eq!("notes".parse::<StickerKind>().unwrap(), StickerKind::Note);
        assert!("summary".parse::<StickerKind>().is_err());
    }

    #[test]
    fn stage_uses_backend_field_names() {
        let json = r#"{
            "id": 7,
            "stage_index": 2,
            "title": "Intro",
            "objective": "Skim",
            "stage_text": "Body",
            "suggested_vocab": [{"word": "gist", "definition": "main point"}]
        }"#;
        let stage: Stage = serde_json::from_str(json).unwrap();
        assert_eq!(stage.id, StageId(7));
        assert_eq!(stage.index, 2);
        assert_eq!(stage.text, "Body");
        assert_eq!(stage.suggested_vocabulary[0].word, "gist");
        assert!(stage.note.is_none());
    }
}
