//! Pointer-up handling over rendered stage text.
//!
//! A UI forwards each pointer-up on the text surface as a [`PointerUp`]
//! together with a way to read the platform's current text selection. The
//! result says what text the action menu should act on and whether that text
//! is an existing highlight. Nothing here touches annotation state.

use crate::render::TextRun;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the pointer was released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A rendered highlight run, carrying the text of the highlight that
    /// owns it. Matching ignores case, so this can differ from the run's own
    /// characters.
    Highlight { text: String },
    /// Any other part of the text surface.
    Text,
}

impl From<&TextRun<'_>> for PointerTarget {
    fn from(run: &TextRun<'_>) -> Self {
        match run {
            TextRun::Highlighted { highlight, .. } => PointerTarget::Highlight {
                text: highlight.text.clone(),
            },
            TextRun::Plain(_) => PointerTarget::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerUp {
    pub target: PointerTarget,
    pub position: Point,
}

/// Access to the rendering surface's current text selection.
pub trait SelectionSource {
    fn selected_text(&self) -> Option<String>;
}

impl SelectionSource for str {
    fn selected_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl SelectionSource for Option<String> {
    fn selected_text(&self) -> Option<String> {
        self.clone()
    }
}

/// Surface with nothing selected.
pub struct NoSelection;

impl SelectionSource for NoSelection {
    fn selected_text(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub text: String,
    /// Where the menu should appear. Carries no annotation meaning.
    pub anchor: Point,
    pub is_existing_highlight: bool,
}

/// Resolve a pointer-up into something the action menu can act on.
///
/// Clicking a highlight selects that whole highlight and ignores any text
/// selection. Otherwise the platform selection is used as-is, unless it is
/// empty or only whitespace.
pub fn resolve<S: SelectionSource + ?Sized>(
    event: &PointerUp,
    source: &S,
) -> Option<SelectionResult> {
    if let PointerTarget::Highlight { text } = &event.target {
        return Some(SelectionResult {
            text: text.clone(),
            anchor: event.position,
            is_existing_highlight: true,
        });
    }

    let text = source.selected_text()?;
    if text.trim().is_empty() {
        return None;
    }

    Some(SelectionResult {
        text,
        anchor: event.position,
        is_existing_highlight: false,
    })
}
