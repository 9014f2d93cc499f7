//! Subcommand execution against the SQLite-backed memo board.

use crate::cli::{Cli, Command};
use crate::render::write_memo_lines;
use anyhow::Context;
use log::info;
use memopad_core::db::open_db;
use memopad_core::{
    filtered_view, KeyValueMemoRepository, MemoFont, MemoId, MemoStore, SqliteKeyValueStore,
    UpdateOutcome, ViewQuery,
};
use std::io::Write;

/// Runs one subcommand, writing user-facing output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open memo database `{}`", cli.db.display()))?;
    let repo =
        KeyValueMemoRepository::with_key(SqliteKeyValueStore::new(&conn), cli.key.as_str());

    if let Command::Export = cli.command {
        let raw = repo.load_raw()?.unwrap_or_else(|| "[]".to_string());
        writeln!(out, "{raw}")?;
        return Ok(());
    }

    let mut store = MemoStore::try_open(repo)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::Add { text, font } => match store.add(text, font.map(MemoFont::from))? {
            Some(id) => writeln!(out, "Added {id}")?,
            None => writeln!(out, "Nothing to add: memo text is empty.")?,
        },
        Command::List {
            order,
            filter,
            font,
            full,
        } => {
            let query = ViewQuery {
                order: order.into(),
                text_filter: filter,
                font: font.map(MemoFont::from),
            };
            write_memo_lines(out, &filtered_view(store.memos(), &query), full)?;
        }
        Command::Edit { id, text, font } => {
            let outcome = match MemoId::parse(id.as_str()) {
                Some(memo_id) => store.update(&memo_id, text, font.map(MemoFont::from))?,
                None => UpdateOutcome::NotFound,
            };
            match outcome {
                UpdateOutcome::Updated => writeln!(out, "Updated {id}")?,
                UpdateOutcome::Deleted => writeln!(out, "Deleted {id} (empty text)")?,
                UpdateOutcome::NotFound => writeln!(out, "No memo with id {id}")?,
            }
        }
        Command::Delete { id } => {
            let removed = match MemoId::parse(id.as_str()) {
                Some(memo_id) => store.delete(&memo_id)?,
                None => false,
            };
            if removed {
                writeln!(out, "Deleted {id}")?;
            } else {
                writeln!(out, "No memo with id {id}")?;
            }
        }
        Command::Clear => {
            let removed = store.clear_all()?;
            writeln!(out, "Cleared {removed} memo(s).")?;
        }
        Command::Fonts => {
            for font in store.fonts() {
                let marker = if *font == MemoFont::default() {
                    " (default)"
                } else {
                    ""
                };
                writeln!(out, "{font}{marker}")?;
            }
        }
        Command::Export => {}
    }
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List { .. } => "list",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::Clear => "clear",
        Command::Fonts => "fonts",
        Command::Export => "export",
    }
}
