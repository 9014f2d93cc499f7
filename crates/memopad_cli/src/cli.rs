use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use memopad_core::{MemoFont, SortOrder, DEFAULT_MEMO_KEY};

#[derive(Parser, Debug)]
#[command(name = "memopad")]
#[command(about = "A minimalist memo pad for your vibes")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// SQLite file holding the memo board
    #[arg(long, env = "MEMOPAD_DB_PATH", default_value = "memopad.sqlite3")]
    pub db: PathBuf,

    /// Storage key the memo list is written under
    #[arg(long, default_value = DEFAULT_MEMO_KEY)]
    pub key: String,

    /// Write rolling logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level used with --log-dir (trace|debug|info|warn|error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a memo to the top of the board
    Add {
        /// Memo text
        text: String,
        /// Display font for the new memo
        #[arg(long, value_enum)]
        font: Option<FontArg>,
    },
    /// List memos
    List {
        /// Sort by creation time
        #[arg(long, value_enum, default_value_t = OrderArg::Newest)]
        order: OrderArg,
        /// Only show memos containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Only show memos using this font
        #[arg(long, value_enum)]
        font: Option<FontArg>,
        /// Print full memo text instead of a one-line summary
        #[arg(long)]
        full: bool,
    },
    /// Replace a memo's text; empty text deletes it
    Edit {
        /// Memo id
        id: String,
        /// New text
        text: String,
        /// New display font
        #[arg(long, value_enum)]
        font: Option<FontArg>,
    },
    /// Delete one memo
    Delete {
        /// Memo id
        id: String,
    },
    /// Delete every memo
    Clear,
    /// List available fonts
    Fonts,
    /// Print the raw stored JSON
    Export,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontArg {
    Sans,
    Serif,
    Mono,
    Handwriting,
}

impl From<FontArg> for MemoFont {
    fn from(value: FontArg) -> Self {
        match value {
            FontArg::Sans => MemoFont::Sans,
            FontArg::Serif => MemoFont::Serif,
            FontArg::Mono => MemoFont::Mono,
            FontArg::Handwriting => MemoFont::Handwriting,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    Newest,
    Oldest,
}

impl From<OrderArg> for SortOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Newest => SortOrder::NewestFirst,
            OrderArg::Oldest => SortOrder::OldestFirst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, FontArg, OrderArg};
    use clap::Parser;

    #[test]
    fn parses_add_with_font() {
        let cli = Cli::try_parse_from(["memopad", "--db", "x.db", "add", "hello", "--font", "mono"])
            .unwrap();
        assert_eq!(cli.db.to_str(), Some("x.db"));
        assert_eq!(cli.key, "memos");
        assert_eq!(
            cli.command,
            Command::Add {
                text: "hello".to_string(),
                font: Some(FontArg::Mono),
            }
        );
    }

    #[test]
    fn list_defaults_to_newest_first() {
        let cli = Cli::try_parse_from(["memopad", "list"]).unwrap();
        assert_eq!(
            cli.command,
            Command::List {
                order: OrderArg::Newest,
                filter: None,
                font: None,
                full: false,
            }
        );
    }

    #[test]
    fn rejects_unknown_font() {
        assert!(Cli::try_parse_from(["memopad", "add", "x", "--font", "comic"]).is_err());
    }
}
