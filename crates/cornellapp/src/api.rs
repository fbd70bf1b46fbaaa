//! # API Facade
//!
//! The API layer is a **thin facade** over the reading core. It is the single
//! entry point for every client, whatever draws the screen.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Wires** one [`StageSession`] to one [`ActionMenu`]
//! - **Normalizes inputs** (sticker ids → stickers, pointer events → menu state)
//! - **Returns structured types** (`Result<CmdResult>`, [`MenuOutcome`], runs)
//!
//! ## What the API Does NOT Do
//!
//! - **Annotation logic**: That belongs in `annotations.rs` and `menu.rs`
//! - **I/O operations**: No stdout, stderr, prompts or file formatting
//! - **Presentation concerns**: Returns data and leveled messages, not strings
//!   ready for a terminal
//!
//! ## Generic Over DocumentSource
//!
//! `CornellApi<S: DocumentSource>` works with any backend:
//! - Production: `CornellApi<FileStore>`
//! - Testing: `CornellApi<InMemoryStore>`

use crate::annotations::Confirm;
use crate::error::{CornellError, Result};
use crate::menu::{ActionMenu, MenuAction, MenuOutcome};
use crate::model::{DocumentSummary, Highlight, Sticker, StickerKind};
use crate::render::TextRun;
use crate::selection::{self, PointerUp, SelectionSource};
use crate::session::{SessionContext, SessionState, StageSession};
use crate::store::DocumentSource;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_stickers: Vec<Sticker>,
    pub affected_highlights: Vec<Highlight>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_stickers(mut self, stickers: Vec<Sticker>) -> Self {
        self.affected_stickers = stickers;
        self
    }
}

impl From<&MenuOutcome> for CmdResult {
    fn from(outcome: &MenuOutcome) -> Self {
        match outcome {
            MenuOutcome::Compose { kind, draft } => CmdResult::default()
                .with_message(CmdMessage::info(format!("New {} draft", kind)))
                .with_affected_stickers(vec![draft.clone()]),
            MenuOutcome::Highlighted(highlight) => {
                let mut result = CmdResult::default()
                    .with_message(CmdMessage::success(format!("Highlighted \"{}\"", highlight.text)));
                result.affected_highlights.push(highlight.clone());
                result
            }
            MenuOutcome::NothingHighlighted => {
                CmdResult::default().with_message(CmdMessage::warning("Nothing to highlight"))
            }
            MenuOutcome::HighlightsRemoved(0) => {
                CmdResult::default().with_message(CmdMessage::warning("No matching highlight"))
            }
            MenuOutcome::HighlightsRemoved(n) => CmdResult::default()
                .with_message(CmdMessage::success(format!("Removed {} highlight(s)", n))),
        }
    }
}

/// The main API facade for reading sessions.
pub struct CornellApi<S: DocumentSource> {
    session: StageSession<S>,
    menu: ActionMenu,
}

impl<S: DocumentSource> CornellApi<S> {
    pub fn new(source: S, context: SessionContext) -> Self {
        Self {
            session: StageSession::new(source, context),
            menu: ActionMenu::new(),
        }
    }

    /// Load the document's stages, falling back to its raw text.
    pub fn open(&mut self) -> Result<CmdResult> {
        self.menu.close();
        let state = self.session.load_stages();
        Ok(self.describe_load(state))
    }

    /// Skip the reading plan and show the raw text as one stage.
    pub fn force_fallback(&mut self) -> Result<CmdResult> {
        self.menu.close();
        let state = self.session.load_fallback();
        Ok(self.describe_load(state))
    }

    /// Switch to a stage by position (0-based).
    pub fn go_to_stage(&mut self, index: usize) -> Result<CmdResult> {
        self.menu.close();
        self.session.set_active_index(index)?;
        let stage = self.session.active_stage().ok_or(CornellError::NoActiveStage)?;
        Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "Stage {}: {}",
            stage.index, stage.title
        ))))
    }

    /// Feed a pointer-up from the text surface. Returns the menu's actions,
    /// empty when nothing actionable was selected.
    pub fn pointer_up<Sel: SelectionSource + ?Sized>(
        &mut self,
        event: &PointerUp,
        source: &Sel,
    ) -> Vec<MenuAction> {
        if self.session.active_stage().is_none() {
            self.menu.close();
            return Vec::new();
        }
        self.menu.open(selection::resolve(event, source));
        self.menu.actions()
    }

    pub fn choose(&mut self, action: MenuAction) -> Result<MenuOutcome> {
        let store = self.session.annotations_mut()?;
        self.menu.dispatch(action, store)
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    /// Save sticker content: a new sticker, an edit, or a draft from the menu.
    pub fn save_sticker(
        &mut self,
        kind: StickerKind,
        existing: Option<&Sticker>,
        content: &str,
    ) -> Result<CmdResult> {
        let store = self.session.annotations_mut()?;
        let mut result = CmdResult::default();
        match store.save_sticker(kind, existing, content, None) {
            Some(sticker) => {
                result.add_message(CmdMessage::success(format!("{} saved", sticker_noun(kind))));
                result.affected_stickers.push(sticker);
            }
            None if content.trim().is_empty() => {
                result.add_message(CmdMessage::warning("A sticker needs some content"));
            }
            None => {
                let id = existing.map(|s| s.id).unwrap_or_default();
                return Err(CornellError::StickerNotFound(id));
            }
        }
        Ok(result)
    }

    pub fn edit_sticker(&mut self, kind: StickerKind, id: Uuid, content: &str) -> Result<CmdResult> {
        let existing = self.find_sticker(kind, id)?;
        self.save_sticker(kind, Some(&existing), content)
    }

    pub fn delete_sticker<C: Confirm + ?Sized>(
        &mut self,
        kind: StickerKind,
        id: Uuid,
        confirm: &C,
    ) -> Result<CmdResult> {
        let existing = self.find_sticker(kind, id)?;
        let store = self.session.annotations_mut()?;
        if store.delete_sticker(kind, &id, confirm) {
            Ok(CmdResult::default()
                .with_affected_stickers(vec![existing])
                .with_message(CmdMessage::success(format!("{} deleted", sticker_noun(kind)))))
        } else {
            Ok(CmdResult::default().with_message(CmdMessage::info("Nothing deleted")))
        }
    }

    pub fn set_summary(&mut self, summary: &str) -> Result<CmdResult> {
        self.session.annotations_mut()?.set_summary(summary);
        Ok(CmdResult::default().with_message(CmdMessage::success("Summary updated")))
    }

    /// Persist the active stage's annotations.
    pub fn save(&mut self) -> Result<CmdResult> {
        self.session.persist_active()?;
        Ok(CmdResult::default().with_message(CmdMessage::success("Notes saved!")))
    }

    pub fn render_active(&self) -> Option<Vec<TextRun<'_>>> {
        self.session.render_active()
    }

    pub fn report(&self) -> Result<DocumentSummary> {
        self.session.document_summary()
    }

    pub fn session(&self) -> &StageSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut StageSession<S> {
        &mut self.session
    }

    pub fn menu(&self) -> &ActionMenu {
        &self.menu
    }

    fn find_sticker(&self, kind: StickerKind, id: Uuid) -> Result<Sticker> {
        self.session
            .annotations()
            .stickers(kind)
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(CornellError::StickerNotFound(id))
    }

    fn describe_load(&self, state: SessionState) -> CmdResult {
        let mut result = CmdResult::default();
        match state {
            SessionState::Ready { .. } => {
                result.add_message(CmdMessage::info(format!(
                    "{} stage(s) loaded",
                    self.session.stages().len()
                )));
            }
            SessionState::Empty | SessionState::Loading => {
                result.add_message(CmdMessage::warning("No stages found."));
                for line in self.session.logs() {
                    result.add_message(CmdMessage::info(line.clone()));
                }
            }
        }
        result
    }
}

fn sticker_noun(kind: StickerKind) -> &'static str {
    match kind {
        StickerKind::Cue => "Cue",
        StickerKind::Note => "Note",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentId, Stage, StageId};
    use crate::selection::{Point, PointerTarget};
    use crate::store::memory::InMemoryStore;

    const DOC: DocumentId = DocumentId(9);

    fn api() -> CornellApi<InMemoryStore> {
        let stages = vec![
            Stage {
                id: StageId(90),
                index: 1,
                title: "Cats".into(),
                objective: "Learn".into(),
                text: "the category of cats".into(),
                suggested_vocabulary: vec![],
                note: None,
            },
            Stage {
                id: StageId(91),
                index: 2,
                title: "Dogs".into(),
                objective: "Learn".into(),
                text: "dogs are loyal".into(),
                suggested_vocabulary: vec![],
                note: None,
            },
        ];
        let store = InMemoryStore::new().with_document(DOC, "", stages);
        let mut api = CornellApi::new(store, SessionContext::new(DOC));
        api.open().unwrap();
        api
    }

    fn select(api: &mut CornellApi<InMemoryStore>, text: &str) -> Vec<MenuAction> {
        let event = PointerUp {
            target: PointerTarget::Text,
            position: Point::new(0.0, 0.0),
        };
        api.pointer_up(&event, text)
    }

    #[test]
    fn open_reports_empty_documents_with_logs() {
        let store = InMemoryStore::new().with_document(DOC, "", vec![]);
        let mut api = CornellApi::new(store, SessionContext::new(DOC));
        let result = api.open().unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.messages.len() > 1);
    }

    #[test]
    fn selection_to_highlight_to_render() {
        let mut api = api();
        let actions = select(&mut api, "category");
        assert!(actions.contains(&MenuAction::Highlight));

        api.choose(MenuAction::Highlight).unwrap();
        let runs = api.render_active().unwrap();
        let marked: Vec<&str> = runs
            .iter()
            .filter(|r| r.is_highlighted())
            .map(TextRun::as_str)
            .collect();
        assert_eq!(marked, vec!["category"]);
    }

    #[test]
    fn blank_selection_opens_no_menu() {
        let mut api = api();
        assert!(select(&mut api, "  ").is_empty());
        assert!(!api.menu().is_open());
        assert!(api.choose(MenuAction::Highlight).is_err());
    }

    #[test]
    fn compose_from_selection_then_save() {
        let mut api = api();
        select(&mut api, "cats");
        let MenuOutcome::Compose { kind, draft } = api.choose(MenuAction::CreateCue).unwrap() else {
            panic!("expected compose");
        };

        let blank = api.save_sticker(kind, Some(&draft), " ").unwrap();
        assert_eq!(blank.messages[0].level, MessageLevel::Warning);
        assert!(api.session().annotations().stickers(kind).is_empty());

        let saved = api.save_sticker(kind, Some(&draft), "Why cats?").unwrap();
        assert_eq!(saved.affected_stickers[0].selected_text.as_deref(), Some("cats"));
        assert_eq!(api.session().annotations().stickers(kind).len(), 1);
    }

    #[test]
    fn edit_and_delete_by_id() {
        let mut api = api();
        let saved = api
            .save_sticker(StickerKind::Note, None, "first take")
            .unwrap();
        let id = saved.affected_stickers[0].id;

        api.edit_sticker(StickerKind::Note, id, "second take").unwrap();
        assert_eq!(
            api.session().annotations().stickers(StickerKind::Note)[0].content,
            "second take"
        );

        let declined = api
            .delete_sticker(StickerKind::Note, id, &|_: &str| false)
            .unwrap();
        assert!(declined.affected_stickers.is_empty());

        let deleted = api
            .delete_sticker(StickerKind::Note, id, &|_: &str| true)
            .unwrap();
        assert_eq!(deleted.affected_stickers[0].id, id);
        assert!(matches!(
            api.edit_sticker(StickerKind::Note, id, "gone"),
            Err(CornellError::StickerNotFound(_))
        ));
    }

    #[test]
    fn save_after_navigation_targets_the_new_stage() {
        let mut api = api();
        api.set_summary("about cats").unwrap();
        api.go_to_stage(1).unwrap();
        api.set_summary("about dogs").unwrap();
        api.save().unwrap();

        let source = api.session().source();
        assert_eq!(source.saved_record(StageId(91)).unwrap().summary, "about dogs");
        assert!(source.saved_record(StageId(90)).is_none());
        assert_eq!(
            api.session().stages()[0].note.as_ref().unwrap().summary,
            "about cats"
        );
    }

    #[test]
    fn outcomes_become_messages() {
        let mut api = api();
        select(&mut api, "dogs");
        let outcome = api.choose(MenuAction::Highlight).unwrap();
        let result = CmdResult::from(&outcome);
        assert_eq!(result.affected_highlights[0].text, "dogs");
        assert_eq!(result.messages[0].level, MessageLevel::Success);

        let none = CmdResult::from(&MenuOutcome::HighlightsRemoved(0));
        assert_eq!(none.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn navigation_closes_the_menu() {
        let mut api = api();
        select(&mut api, "cats");
        assert!(api.menu().is_open());
        api.go_to_stage(1).unwrap();
        assert!(!api.menu().is_open());
    }
}
