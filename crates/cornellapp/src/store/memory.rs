use super::DocumentSource;
use crate::error::{CornellError, Result};
use crate::model::{AnnotationRecord, DocumentId, Stage, StageId};
use std::collections::HashMap;

#[derive(Clone, Default)]
struct MemDocument {
    raw_text: String,
    stages: Vec<Stage>,
}

/// In-memory document source for testing.
///
/// Saved notes are kept apart from the stages they belong to and attached on
/// every listing, the way a real backend joins them.
#[derive(Default)]
pub struct InMemoryStore {
    documents: HashMap<DocumentId, MemDocument>,
    notes: HashMap<StageId, AnnotationRecord>,
    simulate_fetch_error: bool,
    simulate_write_error: bool,
    save_calls: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(&mut self, document: DocumentId, raw_text: &str, stages: Vec<Stage>) {
        self.documents.insert(
            document,
            MemDocument {
                raw_text: raw_text.to_string(),
                stages,
            },
        );
    }

    pub fn with_document(mut self, document: DocumentId, raw_text: &str, stages: Vec<Stage>) -> Self {
        self.insert_document(document, raw_text, stages);
        self
    }

    /// Make stage listings and raw text reads fail.
    pub fn set_simulate_fetch_error(&mut self, simulate: bool) {
        self.simulate_fetch_error = simulate;
    }

    /// Make note saves fail.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn saved_record(&self, stage: StageId) -> Option<&AnnotationRecord> {
        self.notes.get(&stage)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls
    }

    fn document(&self, document: DocumentId) -> Result<&MemDocument> {
        if self.simulate_fetch_error {
            return Err(CornellError::Fetch("Simulated fetch error".to_string()));
        }
        self.documents
            .get(&document)
            .ok_or(CornellError::DocumentNotFound(document))
    }
}

impl DocumentSource for InMemoryStore {
    fn list_stages(&self, document: DocumentId) -> Result<Vec<Stage>> {
        let doc = self.document(document)?;
        Ok(doc
            .stages
            .iter()
            .cloned()
            .map(|mut stage| {
                if let Some(record) = self.notes.get(&stage.id) {
                    stage.note = Some(record.clone());
                }
                stage
            })
            .collect())
    }

    fn raw_text(&self, document: DocumentId) -> Result<String> {
        Ok(self.document(document)?.raw_text.clone())
    }

    fn save_annotation_record(&mut self, stage: StageId, record: &AnnotationRecord) -> Result<()> {
        self.save_calls += 1;
        if self.simulate_write_error {
            return Err(CornellError::Persist("Simulated write error".to_string()));
        }
        let known = self
            .documents
            .values()
            .any(|doc| doc.stages.iter().any(|s| s.id == stage));
        if !known {
            return Err(CornellError::Persist(format!("stage {} does not exist", stage)));
        }
        self.notes.insert(stage, record.clone());
        Ok(())
    }
}
