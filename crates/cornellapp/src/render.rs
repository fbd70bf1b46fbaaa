//! # Highlight Rendering
//!
//! Turns stage text plus a set of highlights into a sequence of runs, each
//! either plain or highlighted. Rendering happens in two steps:
//!
//! 1. **Match spans**: highlights are visited longest text first (ties keep
//!    their original order). Each one is searched case-insensitively, as a
//!    literal, only inside the stretches of text no earlier highlight has
//!    claimed. Claimed text is opaque, so a short highlight that lives inside
//!    a longer one never splits it or wraps it twice.
//! 2. **Runs**: the sorted, non-overlapping spans cut the text into runs.
//!
//! Runs borrow from the input, so concatenating them gives back the original
//! text byte for byte. Highlighted runs keep the text's own casing.

use crate::model::Highlight;
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::ops::Range;

/// A byte range of the text claimed by one highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub range: Range<usize>,
    /// Position of the claiming highlight in the input slice.
    pub highlight: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun<'a> {
    Plain(&'a str),
    Highlighted {
        text: &'a str,
        highlight: &'a Highlight,
    },
}

impl<'a> TextRun<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            TextRun::Plain(text) => text,
            TextRun::Highlighted { text, .. } => text,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, TextRun::Highlighted { .. })
    }
}

pub fn render<'a>(text: &'a str, highlights: &'a [Highlight]) -> Vec<TextRun<'a>> {
    if highlights.is_empty() {
        return vec![TextRun::Plain(text)];
    }

    let spans = match_spans(text, highlights);
    let mut runs = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        if span.range.start > cursor {
            runs.push(TextRun::Plain(&text[cursor..span.range.start]));
        }
        runs.push(TextRun::Highlighted {
            text: &text[span.range.clone()],
            highlight: &highlights[span.highlight],
        });
        cursor = span.range.end;
    }

    if cursor < text.len() || runs.is_empty() {
        runs.push(TextRun::Plain(&text[cursor..]));
    }

    runs
}

/// Compute the non-overlapping highlight spans of `text`, sorted by start.
pub fn match_spans(text: &str, highlights: &[Highlight]) -> Vec<MatchSpan> {
    let mut order: Vec<usize> = (0..highlights.len())
        .filter(|&i| !highlights[i].text.is_empty())
        .collect();
    // Stable sort: equal lengths keep input order
    order.sort_by_key(|&i| Reverse(highlights[i].text.chars().count()));

    let mut spans: Vec<MatchSpan> = Vec::new();

    for i in order {
        let Some(pattern) = literal_pattern(&highlights[i].text) else {
            continue;
        };

        let mut found = Vec::new();
        for gap in unclaimed(text.len(), &spans) {
            let offset = gap.start;
            for m in pattern.find_iter(&text[gap]) {
                if m.start() == m.end() {
                    continue;
                }
                found.push(MatchSpan {
                    range: offset + m.start()..offset + m.end(),
                    highlight: i,
                });
            }
        }

        if !found.is_empty() {
            spans.extend(found);
            spans.sort_by_key(|span| span.range.start);
        }
    }

    spans
}

/// Concatenate runs back into text.
pub fn plain_text(runs: &[TextRun<'_>]) -> String {
    runs.iter().map(TextRun::as_str).collect()
}

fn literal_pattern(text: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::warn!("skipping highlight {:?}: {}", text, err);
            None
        }
    }
}

fn unclaimed(len: usize, spans: &[MatchSpan]) -> Vec<Range<usize>> {
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.range.start > cursor {
            gaps.push(cursor..span.range.start);
        }
        cursor = cursor.max(span.range.end);
    }
    if cursor < len {
        gaps.push(cursor..len);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn highlights(texts: &[&str]) -> Vec<Highlight> {
        texts.iter().map(|t| Highlight::new(t.to_string())).collect()
    }

    fn marked<'a>(runs: &[TextRun<'a>]) -> Vec<&'a str> {
        runs.iter()
            .filter(|r| r.is_highlighted())
            .map(TextRun::as_str)
            .collect()
    }

    #[test]
    fn no_highlights_is_identity() {
        let text = "  line one\n\tline two  ";
        let runs = render(text, &[]);
        assert_eq!(runs, vec![TextRun::Plain(text)]);
    }

    #[test]
    fn empty_text_renders_one_plain_run() {
        let set = highlights(&["word"]);
        let runs = render("", &set);
        assert_eq!(runs, vec![TextRun::Plain("")]);
    }

    #[rstest]
    #[case("a.b*c and abbbc", "a.b*c", vec!["a.b*c"])]
    #[case("cost is $5 (approx)", "$5 (approx)", vec!["$5 (approx)"])]
    #[case("[x] or x", "[x]", vec!["[x]"])]
    #[case("path\\to\\file", "\\to", vec!["\\to"])]
    #[case("a|b a b", "a|b", vec!["a|b"])]
    fn metacharacters_match_literally(
        #[case] text: &str,
        #[case] needle: &str,
        #[case] expected: Vec<&str>,
    ) {
        let set = highlights(&[needle]);
        let runs = render(text, &set);
        assert_eq!(marked(&runs), expected);
        assert_eq!(plain_text(&runs), text);
    }

    #[test]
    fn longer_match_wins_over_contained_shorter() {
        let set = highlights(&["cat", "category"]);
        let runs = render("the category", &set);
        assert_eq!(
            runs,
            vec![
                TextRun::Plain("the "),
                TextRun::Highlighted {
                    text: "category",
                    highlight: &set[1],
                },
            ]
        );
    }

    #[test]
    fn shorter_highlight_still_matches_outside_longer_one() {
        let set = highlights(&["cat", "category"]);
        let runs = render("a cat in a category", &set);
        assert_eq!(marked(&runs), vec!["cat", "category"]);
    }

    #[test]
    fn matching_ignores_case_but_keeps_original_text() {
        let set = highlights(&["rust"]);
        let runs = render("Rust and RUST and rust", &set);
        assert_eq!(marked(&runs), vec!["Rust", "RUST", "rust"]);
        assert_eq!(plain_text(&runs), "Rust and RUST and rust");
    }

    #[test]
    fn duplicate_highlights_wrap_once() {
        let set = highlights(&["word", "word", "WORD"]);
        let runs = render("one word here", &set);
        assert_eq!(marked(&runs), vec!["word"]);
        match &runs[1] {
            TextRun::Highlighted { highlight, .. } => assert_eq!(highlight.id, set[0].id),
            other => panic!("expected highlighted run, got {other:?}"),
        }
    }

    #[test]
    fn equal_length_ties_keep_input_order() {
        let set = highlights(&["ab", "bc"]);
        let spans = match_spans("abc", &set);
        assert_eq!(
            spans,
            vec![MatchSpan {
                range: 0..2,
                highlight: 0
            }]
        );

        let reversed = highlights(&["bc", "ab"]);
        let spans = match_spans("abc", &reversed);
        assert_eq!(
            spans,
            vec![MatchSpan {
                range: 1..3,
                highlight: 0
            }]
        );
    }

    #[test]
    fn rendering_twice_is_identical() {
        let set = highlights(&["lorem", "ipsum dolor", "or"]);
        let text = "Lorem ipsum dolor sit amet, lorem or.";
        assert_eq!(render(text, &set), render(text, &set));
    }

    #[test]
    fn preserves_whitespace_and_multibyte_text() {
        let set = highlights(&["café"]);
        let text = "Un café\n\n  au  lait — CAFÉ.";
        let runs = render(text, &set);
        assert_eq!(plain_text(&runs), text);
        assert_eq!(marked(&runs), vec!["café", "CAFÉ"]);
    }

    #[test]
    fn shorter_match_cannot_straddle_a_claimed_span() {
        // "b c" would match across the boundary of the claimed "a b"
        let set = highlights(&["a b", "b c"]);
        let runs = render("a b c", &set);
        assert_eq!(marked(&runs), vec!["a b"]);
    }

    #[test]
    fn empty_highlight_text_is_ignored() {
        let set = highlights(&["", "x"]);
        let runs = render("xyz", &set);
        assert_eq!(marked(&runs), vec!["x"]);
    }
}
