//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data directory and configuration
//! 3. **API Dispatch**: Open the document and drive `CornellApi`
//! 4. **Output Formatting**: Hand results to `print.rs`

use super::print::{print_logs, print_messages, print_report, print_stage, print_stage_list};
use super::setup::{Cli, Commands};
use clap::Parser;
use cornellapp::api::{CmdMessage, CmdResult, CornellApi};
use cornellapp::error::{CornellError, Result};
use cornellapp::init::{initialize, CornellContext};
use cornellapp::menu::{MenuAction, MenuOutcome};
use cornellapp::model::{DocumentId, StickerKind};
use cornellapp::selection::{NoSelection, Point, PointerTarget, PointerUp};
use cornellapp::session::SessionState;
use cornellapp::store::fs::FileStore;
use std::io::{BufRead, Write};
use std::path::Path;
use uuid::Uuid;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = initialize(cli.data)?;

    match cli.command {
        Commands::Import {
            doc,
            raw_file,
            stages,
        } => handle_import(&ctx, doc, &raw_file, stages.as_deref()),
        Commands::Stages { doc } => handle_stages(&ctx, doc),
        Commands::Read { doc, stage, raw } => handle_read(&ctx, doc, stage, raw),
        Commands::Highlight { doc, stage, text } => handle_highlight(&ctx, doc, stage, &text.join(" ")),
        Commands::Unhighlight { doc, stage, text } => {
            handle_unhighlight(&ctx, doc, stage, &text.join(" "))
        }
        Commands::Cue {
            doc,
            stage,
            content,
            on,
        } => handle_sticker(&ctx, doc, stage, StickerKind::Cue, &content.join(" "), on),
        Commands::Note {
            doc,
            stage,
            content,
            on,
        } => handle_sticker(&ctx, doc, stage, StickerKind::Note, &content.join(" "), on),
        Commands::Edit {
            doc,
            stage,
            kind,
            id,
            content,
        } => handle_edit(&ctx, doc, stage, kind, id, &content.join(" ")),
        Commands::Delete {
            doc,
            stage,
            kind,
            id,
            yes,
        } => handle_delete(&ctx, doc, stage, kind, id, yes),
        Commands::Summary { doc, stage, text } => handle_summary(&ctx, doc, stage, &text.join(" ")),
        Commands::Report { doc } => handle_report(&ctx, doc),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    // Tests may run several commands in one process
    let _ = builder.try_init();
}

/// Open a document and make the given stage (1-based) active.
fn open_at(ctx: &CornellContext, doc: DocumentId, stage: usize) -> Result<CornellApi<FileStore>> {
    let mut api = ctx.open(doc)?;
    if api.session().state() != (SessionState::Ready { active: 0 }) {
        print_logs(api.session().logs());
        return Err(CornellError::EmptyResult(doc));
    }
    go_to(&mut api, stage)?;
    Ok(api)
}

/// Stage numbers are 1-based on the command line; errors echo them as typed.
fn go_to(api: &mut CornellApi<FileStore>, stage: usize) -> Result<()> {
    let len = api.session().stages().len();
    if stage == 0 || stage > len {
        return Err(CornellError::StageOutOfRange { index: stage, len });
    }
    if stage > 1 {
        api.go_to_stage(stage - 1)?;
    }
    Ok(())
}

/// Save the active stage and print what happened.
fn finish(api: &mut CornellApi<FileStore>, mut result: CmdResult) -> Result<()> {
    let saved = api.save()?;
    result.messages.extend(saved.messages);
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(
    ctx: &CornellContext,
    doc: DocumentId,
    raw_file: &Path,
    stages_file: Option<&Path>,
) -> Result<()> {
    let raw_text = std::fs::read_to_string(raw_file)?;
    let stages_json = stages_file.map(std::fs::read_to_string).transpose()?;
    let count = ctx.import(doc, &raw_text, stages_json.as_deref())?;

    let message = if count == 0 {
        format!("Imported document {} (raw text only)", doc)
    } else {
        format!("Imported document {} with {} stage(s)", doc, count)
    };
    print_messages(&[CmdMessage::success(message)]);
    Ok(())
}

fn handle_stages(ctx: &CornellContext, doc: DocumentId) -> Result<()> {
    let api = ctx.open(doc)?;
    match api.session().state() {
        SessionState::Ready { .. } => print_stage_list(api.session().stages()),
        _ => print_logs(api.session().logs()),
    }
    Ok(())
}

fn handle_read(ctx: &CornellContext, doc: DocumentId, stage: usize, raw: bool) -> Result<()> {
    let mut api = ctx.open(doc)?;
    if raw {
        api.force_fallback()?;
    }
    if api.session().active_stage().is_none() {
        print_logs(api.session().logs());
        return Ok(());
    }
    go_to(&mut api, stage)?;

    let session = api.session();
    if let (Some(active), Some(index), Some(runs)) = (
        session.active_stage(),
        session.active_index(),
        api.render_active(),
    ) {
        print_stage(
            active,
            index,
            session.stages().len(),
            &runs,
            session.annotations(),
        );
    }
    Ok(())
}

fn text_event() -> PointerUp {
    PointerUp {
        target: PointerTarget::Text,
        position: Point::default(),
    }
}

fn handle_highlight(ctx: &CornellContext, doc: DocumentId, stage: usize, text: &str) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;
    let actions = api.pointer_up(&text_event(), text);
    if !actions.contains(&MenuAction::Highlight) {
        print_messages(&[CmdMessage::warning("Nothing selected")]);
        return Ok(());
    }
    let outcome = api.choose(MenuAction::Highlight)?;
    finish(&mut api, CmdResult::from(&outcome))
}

fn handle_unhighlight(
    ctx: &CornellContext,
    doc: DocumentId,
    stage: usize,
    text: &str,
) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;
    // Click the rendered occurrence, which knows the highlight it belongs to
    let wanted = text.to_lowercase();
    let target = api
        .render_active()
        .and_then(|runs| {
            runs.iter()
                .find(|run| run.is_highlighted() && run.as_str().to_lowercase() == wanted)
                .map(PointerTarget::from)
        })
        .unwrap_or_else(|| PointerTarget::Highlight {
            text: text.to_string(),
        });
    let event = PointerUp {
        target,
        position: Point::default(),
    };
    api.pointer_up(&event, &NoSelection);
    let outcome = api.choose(MenuAction::RemoveHighlight)?;
    finish(&mut api, CmdResult::from(&outcome))
}

fn handle_sticker(
    ctx: &CornellContext,
    doc: DocumentId,
    stage: usize,
    kind: StickerKind,
    content: &str,
    on: Option<String>,
) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;

    let draft = match on {
        Some(passage) => {
            let action = match kind {
                StickerKind::Cue => MenuAction::CreateCue,
                StickerKind::Note => MenuAction::CreateNote,
            };
            if !api.pointer_up(&text_event(), passage.as_str()).contains(&action) {
                print_messages(&[CmdMessage::warning("Nothing selected")]);
                return Ok(());
            }
            match api.choose(action)? {
                MenuOutcome::Compose { draft, .. } => Some(draft),
                _ => None,
            }
        }
        None => None,
    };

    let result = api.save_sticker(kind, draft.as_ref(), content)?;
    if result.affected_stickers.is_empty() {
        print_messages(&result.messages);
        return Ok(());
    }
    finish(&mut api, result)
}

fn handle_edit(
    ctx: &CornellContext,
    doc: DocumentId,
    stage: usize,
    kind: StickerKind,
    id: Uuid,
    content: &str,
) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;
    let result = api.edit_sticker(kind, id, content)?;
    if result.affected_stickers.is_empty() {
        print_messages(&result.messages);
        return Ok(());
    }
    finish(&mut api, result)
}

fn handle_delete(
    ctx: &CornellContext,
    doc: DocumentId,
    stage: usize,
    kind: StickerKind,
    id: Uuid,
    yes: bool,
) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;
    let result = if yes || !ctx.config.confirm_deletes {
        api.delete_sticker(kind, id, &|_: &str| true)?
    } else {
        api.delete_sticker(kind, id, &prompt_yes_no)?
    };
    if result.affected_stickers.is_empty() {
        print_messages(&result.messages);
        return Ok(());
    }
    finish(&mut api, result)
}

fn handle_summary(ctx: &CornellContext, doc: DocumentId, stage: usize, text: &str) -> Result<()> {
    let mut api = open_at(ctx, doc, stage)?;
    let result = api.set_summary(text)?;
    finish(&mut api, result)
}

fn handle_report(ctx: &CornellContext, doc: DocumentId) -> Result<()> {
    let api = ctx.open(doc)?;
    let summary = api.report()?;
    print_report(&summary, api.session().stages());
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
