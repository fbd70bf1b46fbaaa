//! # Annotation Store
//!
//! The working copy of the active stage's annotations. There is exactly one
//! store per session and it only ever holds one stage's state: the session
//! hydrates it with [`AnnotationStore::load`] when a stage becomes active and
//! reads it back with [`AnnotationStore::snapshot`] when leaving or saving.
//!
//! ## Stickers
//!
//! Stickers are created in two steps. [`AnnotationStore::add_sticker`] hands
//! out a draft (fresh id, creation time, empty content) which the caller opens
//! for editing. The draft joins its column on the first
//! [`AnnotationStore::save_sticker`] with non-blank content. Blank content is
//! always rejected, so a column never contains an empty sticker.
//!
//! Deleting a sticker needs an explicit yes from a [`Confirm`] hook.
//!
//! ## Highlights
//!
//! Highlights are identified by their text. Removing a highlight removes every
//! highlight with exactly that text.
//!
//! All operations are synchronous and do no I/O.

use crate::model::{AnnotationRecord, Highlight, Sticker, StickerKind};
use uuid::Uuid;

pub const DEFAULT_DELETE_PROMPT: &str = "Delete this note?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    record: AnnotationRecord,
    drafts: Vec<(StickerKind, Sticker)>,
    delete_prompt: String,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            record: AnnotationRecord::default(),
            drafts: Vec::new(),
            delete_prompt: DEFAULT_DELETE_PROMPT.to_string(),
        }
    }

    pub fn with_delete_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.delete_prompt = prompt.into();
        self
    }

    /// Replace the whole working state. `None` resets to empty.
    pub fn load(&mut self, record: Option<AnnotationRecord>) {
        self.record = record.unwrap_or_default();
        self.drafts.clear();
        log::debug!(
            "loaded annotations: {} cues, {} notes, {} highlights",
            self.record.cue_stickers.len(),
            self.record.note_stickers.len(),
            self.record.highlights.len()
        );
    }

    /// The current working state as a record, ready for persistence or handoff.
    pub fn snapshot(&self) -> AnnotationRecord {
        self.record.clone()
    }

    pub fn record(&self) -> &AnnotationRecord {
        &self.record
    }

    pub fn stickers(&self, kind: StickerKind) -> &[Sticker] {
        self.record.stickers(kind)
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.record.highlights
    }

    pub fn summary(&self) -> &str {
        &self.record.summary
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.record.summary = summary.into();
    }

    /// Open a new, empty sticker for editing.
    pub fn add_sticker(&mut self, kind: StickerKind, selected_text: Option<String>) -> Sticker {
        let draft = Sticker::new(String::new(), non_blank(selected_text));
        self.drafts.push((kind, draft.clone()));
        draft
    }

    /// Drafts handed out by [`Self::add_sticker`] and not yet saved.
    pub fn drafts(&self, kind: StickerKind) -> impl Iterator<Item = &Sticker> {
        self.drafts
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, sticker)| sticker)
    }

    pub fn discard_draft(&mut self, id: &Uuid) -> bool {
        let before = self.drafts.len();
        self.drafts.retain(|(_, draft)| draft.id != *id);
        self.drafts.len() != before
    }

    /// Save sticker content.
    ///
    /// With `existing`, only the content of that sticker changes (or its draft
    /// is committed). Without it a new sticker is appended. Returns the saved
    /// sticker, or `None` when the content is blank or `existing` is unknown.
    pub fn save_sticker(
        &mut self,
        kind: StickerKind,
        existing: Option<&Sticker>,
        content: &str,
        selected_text: Option<String>,
    ) -> Option<Sticker> {
        if content.trim().is_empty() {
            log::debug!("rejected blank {} sticker", kind);
            return None;
        }

        let Some(existing) = existing else {
            let sticker = Sticker::new(content.to_string(), non_blank(selected_text));
            self.record.stickers_mut(kind).push(sticker.clone());
            return Some(sticker);
        };

        if let Some(sticker) = self
            .record
            .stickers_mut(kind)
            .iter_mut()
            .find(|s| s.id == existing.id)
        {
            sticker.content = content.to_string();
            return Some(sticker.clone());
        }

        let position = self
            .drafts
            .iter()
            .position(|(k, draft)| *k == kind && draft.id == existing.id);
        match position {
            Some(position) => {
                let (_, mut draft) = self.drafts.remove(position);
                draft.content = content.to_string();
                self.record.stickers_mut(kind).push(draft.clone());
                Some(draft)
            }
            None => {
                log::warn!("no {} sticker with id {}", kind, existing.id);
                None
            }
        }
    }

    /// Delete a sticker after the user confirms. Returns whether one was removed.
    pub fn delete_sticker<C: Confirm + ?Sized>(
        &mut self,
        kind: StickerKind,
        id: &Uuid,
        confirm: &C,
    ) -> bool {
        if !confirm.confirm(&self.delete_prompt) {
            return false;
        }
        let stickers = self.record.stickers_mut(kind);
        let before = stickers.len();
        stickers.retain(|s| s.id != *id);
        stickers.len() != before
    }

    pub fn add_highlight(&mut self, text: &str) -> Option<Highlight> {
        if text.trim().is_empty() {
            return None;
        }
        let highlight = Highlight::new(text.to_string());
        self.record.highlights.push(highlight.clone());
        Some(highlight)
    }

    /// Remove every highlight whose text equals `text`. Returns how many went.
    pub fn remove_highlight(&mut self, text: &str) -> usize {
        let before = self.record.highlights.len();
        self.record.highlights.retain(|h| h.text != text);
        before - self.record.highlights.len()
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
