//! # Storage Layer
//!
//! The reading core never talks to a backend directly. Everything it needs
//! from the outside world goes through the [`DocumentSource`] trait:
//!
//! - the ordered stages of a document (each with its saved note, if any),
//! - the raw text of a document, for when no stages exist yet,
//! - an upsert of one stage's annotation record.
//!
//! A read-only [`DocumentSummary`] is derived from the stage listing.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON files under a data directory.
//! - [`memory::InMemoryStore`]: For tests, with switches that make reads or
//!   writes fail.
//!
//! ## Storage Layout
//!
//! For `FileStore`:
//! ```text
//! <data>/
//! ├── documents/<doc>/raw.txt       # Raw document text
//! ├── documents/<doc>/stages.json   # Reading plan (array of stages)
//! └── notes/<stage>.json            # One persisted note per stage
//! ```
//!
//! Notes are keyed by stage id alone, so stage ids must be unique across
//! documents. Saving a note for a stage the store does not know fails.

use crate::error::Result;
use crate::model::{AnnotationRecord, DocumentId, DocumentSummary, Stage, StageId, StageNotes};

pub mod fs;
pub mod memory;

/// The external collaborator that owns documents, stages and saved notes.
pub trait DocumentSource {
    /// Stages of a document in reading order, notes attached.
    fn list_stages(&self, document: DocumentId) -> Result<Vec<Stage>>;

    /// Full raw text of a document. Empty when the document has none.
    fn raw_text(&self, document: DocumentId) -> Result<String>;

    /// Create or replace the note of a stage.
    fn save_annotation_record(&mut self, stage: StageId, record: &AnnotationRecord) -> Result<()>;

    /// Totals and every saved note, in stage order.
    fn document_summary(&self, document: DocumentId) -> Result<DocumentSummary> {
        let stages = self.list_stages(document)?;
        let total_vocab_suggested = stages.iter().map(|s| s.suggested_vocabulary.len()).sum();
        let notes = stages
            .iter()
            .filter_map(|stage| {
                stage.note.as_ref().map(|record| StageNotes {
                    stage_id: stage.id,
                    stage_index: stage.index,
                    record: record.clone(),
                })
            })
            .collect();

        Ok(DocumentSummary {
            document_id: document,
            total_stages: stages.len(),
            total_vocab_suggested,
            notes,
        })
    }
}
