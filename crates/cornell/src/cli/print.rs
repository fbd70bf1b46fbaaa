use chrono::{DateTime, Utc};
use colored::Colorize;
use cornellapp::annotations::AnnotationStore;
use cornellapp::api::{CmdMessage, MessageLevel};
use cornellapp::model::{DocumentSummary, Stage, Sticker, StickerKind};
use cornellapp::render::TextRun;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const QUOTE_WIDTH: usize = 40;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// Shown when a document has nothing to read.
pub(super) fn print_logs(logs: &[String]) {
    println!("{}", "No stages found.".yellow());
    println!("{}", "Debug logs:".dimmed());
    for line in logs {
        println!("  {}", line.dimmed());
    }
}

pub(super) fn print_stage_list(stages: &[Stage]) {
    for (i, stage) in stages.iter().enumerate() {
        let marker = match &stage.note {
            Some(note) if !note.is_empty() => "✎",
            _ => " ",
        };
        let idx = format!("{:>3}. ", i + 1);
        let available = LINE_WIDTH.saturating_sub(idx.width() + 2);
        println!(
            "{}{} {}",
            idx.yellow(),
            marker,
            truncate_to_width(&stage.title, available).bold()
        );
        if !stage.objective.is_empty() {
            println!("       {}", truncate_to_width(&stage.objective, available).dimmed());
        }
    }
}

pub(super) fn print_stage(
    stage: &Stage,
    position: usize,
    total: usize,
    runs: &[TextRun<'_>],
    annotations: &AnnotationStore,
) {
    println!(
        "{} {}",
        format!("Stage {}/{}", position + 1, total).yellow(),
        stage.title.bold()
    );
    if !stage.objective.is_empty() {
        println!("{}", stage.objective.italic().dimmed());
    }
    println!("{}", "-".repeat(LINE_WIDTH / 3));

    let mut body = String::new();
    for run in runs {
        let piece = match run {
            TextRun::Plain(s) => s.normal(),
            TextRun::Highlighted { text, .. } => text.black().on_yellow(),
        };
        body.push_str(&piece.to_string());
    }
    println!("{}", body);

    if !stage.suggested_vocabulary.is_empty() {
        println!();
        println!("{}", "VOCABULARY".bold());
        for vocab in &stage.suggested_vocabulary {
            println!("  {}: {}", vocab.word.cyan(), vocab.definition);
        }
    }

    for kind in [StickerKind::Cue, StickerKind::Note] {
        let stickers = annotations.stickers(kind);
        if stickers.is_empty() {
            continue;
        }
        println!();
        println!("{}", kind.label().bold());
        for sticker in stickers {
            print_sticker(sticker);
        }
    }

    if !annotations.summary().is_empty() {
        println!();
        println!("{}", "SUMMARY".bold());
        println!("{}", annotations.summary());
    }
}

fn print_sticker(sticker: &Sticker) {
    let time_ago = format_time_ago(sticker.created_at);
    let available = LINE_WIDTH.saturating_sub(TIME_WIDTH + 4);
    let content = truncate_to_width(&sticker.content, available);
    let padding = available.saturating_sub(content.width());

    println!(
        "  • {}{}{}",
        content,
        " ".repeat(padding),
        time_ago.dimmed()
    );
    if let Some(quote) = &sticker.selected_text {
        println!(
            "    {}",
            format!("“{}”", truncate_to_width(quote, QUOTE_WIDTH)).italic().dimmed()
        );
    }
    println!("    {}", sticker.id.to_string().dimmed());
}

pub(super) fn print_report(summary: &DocumentSummary, stages: &[Stage]) {
    println!("{} {}", "Document".yellow(), summary.document_id.to_string().bold());
    println!("  stages:           {}", summary.total_stages);
    println!("  suggested vocab:  {}", summary.total_vocab_suggested);
    println!("  stages with notes: {}", summary.notes.len());

    for notes in &summary.notes {
        let title = stages
            .iter()
            .find(|s| s.id == notes.stage_id)
            .map(|s| s.title.as_str())
            .unwrap_or("");
        println!();
        println!(
            "{} {}",
            format!("Stage {}", notes.stage_index).yellow(),
            title.bold()
        );
        let record = &notes.record;
        println!(
            "  {} cue(s), {} note(s), {} highlight(s)",
            record.cue_stickers.len(),
            record.note_stickers.len(),
            record.highlights.len()
        );
        for cue in &record.cue_stickers {
            println!("  ? {}", cue.content);
        }
        if !record.summary.is_empty() {
            println!("  {}", record.summary.dimmed());
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
    }

    #[test]
    fn long_text_gets_an_ellipsis() {
        let out = truncate_to_width("abcdefghij", 5);
        assert_eq!(out, "abcd…");
        assert_eq!(out.width(), 5);
    }

    #[test]
    fn wide_chars_count_double() {
        let out = truncate_to_width("日本語のテキスト", 7);
        assert!(out.width() <= 7);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn time_is_right_aligned() {
        let formatted = format_time_ago(Utc::now() - chrono::Duration::hours(2));
        assert_eq!(formatted.trim(), "2 hours ago");
        assert_eq!(formatted.width(), TIME_WIDTH);
    }
}
