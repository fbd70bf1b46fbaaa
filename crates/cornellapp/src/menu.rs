//! The action menu shown over a text selection.
//!
//! ```text
//!            open(Some(selection))
//!   Closed ─────────────────────────▶ Open(selection)
//!     ▲                                   │
//!     └──────── close() / dispatch() ─────┘
//! ```
//!
//! An open menu always offers "create cue" and "create note". The third
//! entry depends on the selection: plain text can be highlighted, an existing
//! highlight can be removed.

use crate::annotations::AnnotationStore;
use crate::error::{CornellError, Result};
use crate::model::{Highlight, Sticker, StickerKind};
use crate::selection::SelectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    CreateCue,
    CreateNote,
    Highlight,
    RemoveHighlight,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open(SelectionResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuOutcome {
    /// A sticker draft was opened; the client should show its editor.
    Compose { kind: StickerKind, draft: Sticker },
    Highlighted(Highlight),
    /// The selection was blank after all; nothing changed.
    NothingHighlighted,
    HighlightsRemoved(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ActionMenu {
    state: MenuState,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open over a selection. A `None` selection leaves the menu closed.
    pub fn open(&mut self, selection: Option<SelectionResult>) -> bool {
        self.state = match selection {
            Some(selection) => MenuState::Open(selection),
            None => MenuState::Closed,
        };
        self.is_open()
    }

    pub fn close(&mut self) {
        self.state = MenuState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open(_))
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn selection(&self) -> Option<&SelectionResult> {
        match &self.state {
            MenuState::Open(selection) => Some(selection),
            MenuState::Closed => None,
        }
    }

    /// Legal actions for the current state, in menu order.
    pub fn actions(&self) -> Vec<MenuAction> {
        match &self.state {
            MenuState::Closed => Vec::new(),
            MenuState::Open(selection) => {
                let third = if selection.is_existing_highlight {
                    MenuAction::RemoveHighlight
                } else {
                    MenuAction::Highlight
                };
                vec![MenuAction::CreateCue, MenuAction::CreateNote, third]
            }
        }
    }

    /// Run an action against the store and close the menu.
    pub fn dispatch(
        &mut self,
        action: MenuAction,
        store: &mut AnnotationStore,
    ) -> Result<MenuOutcome> {
        if !self.actions().contains(&action) {
            return Err(CornellError::IllegalAction(action));
        }
        let MenuState::Open(selection) = std::mem::take(&mut self.state) else {
            return Err(CornellError::IllegalAction(action));
        };

        let outcome = match action {
            MenuAction::CreateCue => MenuOutcome::Compose {
                kind: StickerKind::Cue,
                draft: store.add_sticker(StickerKind::Cue, Some(selection.text)),
            },
            MenuAction::CreateNote => MenuOutcome::Compose {
                kind: StickerKind::Note,
                draft: store.add_sticker(StickerKind::Note, Some(selection.text)),
            },
            MenuAction::Highlight => match store.add_highlight(&selection.text) {
                Some(highlight) => MenuOutcome::Highlighted(highlight),
                None => MenuOutcome::NothingHighlighted,
            },
            MenuAction::RemoveHighlight => {
                MenuOutcome::HighlightsRemoved(store.remove_highlight(&selection.text))
            }
        };
        Ok(outcome)
    }
}
