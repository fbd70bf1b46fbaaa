//! # Stage Session
//!
//! A session owns the stages of one document, knows which one is active, and
//! owns the single [`AnnotationStore`] holding the active stage's working
//! annotations.
//!
//! ## States
//!
//! ```text
//!  Loading ──load_stages()──▶ Ready { active }
//!     │                           ▲
//!     │ empty / failed            │ raw text present
//!     ▼                           │
//!  load_fallback() ───────────────┘
//!     │
//!     │ no raw text / failed
//!     ▼
//!   Empty   (retry with load_stages() or load_fallback())
//! ```
//!
//! ## Flush and hydrate
//!
//! Changing the active stage first writes the store's snapshot back onto the
//! stage being left (flush), then loads the incoming stage's note into the
//! store (hydrate). Edits are therefore never lost by navigating, even though
//! nothing reaches the backend until [`StageSession::persist_active`].
//!
//! Both `set_active_index` and `persist_active` take `&mut self`, so a
//! navigation cannot start while a save is outstanding.
//!
//! ## Diagnostics
//!
//! Every load step is recorded as a timestamped line in [`StageSession::logs`]
//! so a client stuck in `Empty` can show the operator what happened.

use crate::annotations::{AnnotationStore, DEFAULT_DELETE_PROMPT};
use crate::config::CornellConfig;
use crate::error::{CornellError, Result};
use crate::model::{DocumentId, DocumentSummary, Stage};
use crate::render::{render, TextRun};
use crate::store::DocumentSource;
use chrono::Utc;

pub const DEFAULT_FALLBACK_TITLE: &str = "Full Document (Raw)";
pub const DEFAULT_FALLBACK_OBJECTIVE: &str = "Read the full document.";

/// Who and what a session is for. Passed in, never read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub document_id: DocumentId,
    pub fallback_title: String,
    pub fallback_objective: String,
    pub delete_prompt: String,
}

impl SessionContext {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            fallback_objective: DEFAULT_FALLBACK_OBJECTIVE.to_string(),
            delete_prompt: DEFAULT_DELETE_PROMPT.to_string(),
        }
    }

    pub fn from_config(document_id: DocumentId, config: &CornellConfig) -> Self {
        Self {
            document_id,
            fallback_title: config.fallback_title.clone(),
            fallback_objective: config.fallback_objective.clone(),
            delete_prompt: config.delete_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready { active: usize },
    Empty,
}

pub struct StageSession<S: DocumentSource> {
    source: S,
    context: SessionContext,
    stages: Vec<Stage>,
    state: SessionState,
    annotations: AnnotationStore,
    logs: Vec<String>,
}

impl<S: DocumentSource> StageSession<S> {
    pub fn new(source: S, context: SessionContext) -> Self {
        let annotations = AnnotationStore::new().with_delete_prompt(context.delete_prompt.clone());
        Self {
            source,
            context,
            stages: Vec::new(),
            state: SessionState::Loading,
            annotations,
            logs: Vec::new(),
        }
    }

    /// Fetch the reading plan, falling back to raw text when there is none.
    ///
    /// Never fails: problems end up in [`Self::logs`] and, at worst, in
    /// [`SessionState::Empty`]. Unsaved edits of a previously loaded plan are
    /// discarded.
    pub fn load_stages(&mut self) -> SessionState {
        let document = self.context.document_id;
        self.state = SessionState::Loading;
        self.note(format!("Fetching stages for doc: {}", document));

        match self.source.list_stages(document) {
            Ok(stages) if !stages.is_empty() => {
                self.note(format!("Stages received: {}", stages.len()));
                self.enter(stages);
            }
            Ok(_) => {
                self.warn(CornellError::EmptyResult(document).to_string());
                self.note("No stages found. Triggering fallback...".to_string());
                self.load_fallback();
            }
            Err(err) => {
                self.warn(format!("Error loading stages: {}", err));
                self.note("Attempting fallback due to error...".to_string());
                self.load_fallback();
            }
        }
        self.state
    }

    /// Show the whole raw document as a single synthetic stage.
    pub fn load_fallback(&mut self) -> SessionState {
        let document = self.context.document_id;
        self.note("Fetching raw document text...".to_string());

        match self.source.raw_text(document) {
            Ok(text) if !text.is_empty() => {
                self.note(format!("Document data received. Raw len: {}", text.len()));
                let stage = Stage::fallback(
                    text,
                    &self.context.fallback_title,
                    &self.context.fallback_objective,
                );
                self.enter(vec![stage]);
            }
            Ok(_) => {
                self.warn("Document data missing raw text".to_string());
                self.settle_without_stages();
            }
            Err(err) => {
                self.warn(format!("Fallback failed: {}", err));
                self.settle_without_stages();
            }
        }
        self.state
    }

    /// Make another stage active, flushing the current one first.
    pub fn set_active_index(&mut self, index: usize) -> Result<()> {
        let active = self.active_index().ok_or(CornellError::NoActiveStage)?;
        if index >= self.stages.len() {
            return Err(CornellError::StageOutOfRange {
                index,
                len: self.stages.len(),
            });
        }

        self.flush(active);
        self.annotations.load(self.stages[index].note.clone());
        self.state = SessionState::Ready { active: index };
        log::debug!("stage {} -> {}", active, index);
        Ok(())
    }

    /// Move one stage forward. Returns false on the last stage.
    pub fn next_stage(&mut self) -> Result<bool> {
        let active = self.active_index().ok_or(CornellError::NoActiveStage)?;
        if active + 1 >= self.stages.len() {
            return Ok(false);
        }
        self.set_active_index(active + 1)?;
        Ok(true)
    }

    /// Move one stage back. Returns false on the first stage.
    pub fn previous_stage(&mut self) -> Result<bool> {
        let active = self.active_index().ok_or(CornellError::NoActiveStage)?;
        if active == 0 {
            return Ok(false);
        }
        self.set_active_index(active - 1)?;
        Ok(true)
    }

    /// Send the active stage's annotations to the backend.
    ///
    /// The local copy on the stage is only updated once the backend accepts
    /// the record. On failure nothing changes and the caller may retry.
    pub fn persist_active(&mut self) -> Result<()> {
        let active = self.active_index().ok_or(CornellError::NoActiveStage)?;
        let record = self.annotations.snapshot();
        let stage_id = self.stages[active].id;

        match self.source.save_annotation_record(stage_id, &record) {
            Ok(()) => {
                self.stages[active].note = Some(record);
                log::info!("saved notes for stage {}", stage_id);
                Ok(())
            }
            Err(err) => {
                let err = match err {
                    CornellError::Persist(_) => err,
                    other => CornellError::Persist(other.to_string()),
                };
                log::warn!("saving stage {} failed: {}", stage_id, err);
                Err(err)
            }
        }
    }

    pub fn document_summary(&self) -> Result<DocumentSummary> {
        self.source.document_summary(self.context.document_id)
    }

    /// Active stage text split into plain and highlighted runs.
    pub fn render_active(&self) -> Option<Vec<TextRun<'_>>> {
        let stage = self.active_stage()?;
        Some(render(&stage.text, self.annotations.highlights()))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            SessionState::Ready { active } => Some(active),
            _ => None,
        }
    }

    pub fn active_stage(&self) -> Option<&Stage> {
        self.active_index().and_then(|i| self.stages.get(i))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// The working annotations; only available while a stage is active.
    pub fn annotations_mut(&mut self) -> Result<&mut AnnotationStore> {
        if self.active_index().is_none() {
            return Err(CornellError::NoActiveStage);
        }
        Ok(&mut self.annotations)
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn enter(&mut self, stages: Vec<Stage>) {
        self.stages = stages;
        self.annotations.load(self.stages[0].note.clone());
        self.state = SessionState::Ready { active: 0 };
    }

    fn settle_without_stages(&mut self) {
        self.state = match self.state {
            SessionState::Ready { active } if !self.stages.is_empty() => {
                SessionState::Ready { active }
            }
            _ => SessionState::Empty,
        };
    }

    fn flush(&mut self, active: usize) {
        let record = self.annotations.snapshot();
        let stage = &mut self.stages[active];
        if record.is_empty() && stage.note.is_none() {
            return;
        }
        stage.note = Some(record);
    }

    fn note(&mut self, message: String) {
        log::info!("{}", message);
        self.push_log(message);
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.push_log(message);
    }

    fn push_log(&mut self, message: String) {
        let stamp = Utc::now().format("%H:%M:%S%.3fZ");
        self.logs.push(format!("{} - {}", stamp, message));
    }
}
