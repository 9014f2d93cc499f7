//! Plain-text rendering of memo views.

use chrono::Local;
use memopad_core::{summarize_text, Memo, SUMMARY_DEFAULT_CHARS};
use std::io::{self, Write};

pub const EMPTY_BOARD_MESSAGE: &str = "No memos yet. Add one!";

/// Writes one line per memo: `<id>  <local time>  [<font>]  <text>`.
pub fn write_memo_lines(out: &mut impl Write, memos: &[&Memo], full: bool) -> io::Result<()> {
    if memos.is_empty() {
        return writeln!(out, "{EMPTY_BOARD_MESSAGE}");
    }
    for memo in memos {
        let created = memo
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M");
        if full {
            writeln!(out, "{}  {created}  [{}]", memo.id, memo.font)?;
            for line in memo.text.lines() {
                writeln!(out, "    {line}")?;
            }
        } else {
            writeln!(
                out,
                "{}  {created}  [{}]  {}",
                memo.id,
                memo.font,
                summarize_text(&memo.text, SUMMARY_DEFAULT_CHARS)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_memo_lines, EMPTY_BOARD_MESSAGE};
    use memopad_core::{Memo, MemoFont};

    #[test]
    fn empty_view_prints_placeholder() {
        let mut out = Vec::new();
        write_memo_lines(&mut out, &[], false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), EMPTY_BOARD_MESSAGE);
    }

    #[test]
    fn summary_mode_keeps_one_line_per_memo() {
        let memo = Memo::new("first line\nsecond line", MemoFont::Serif).unwrap();
        let mut out = Vec::new();
        write_memo_lines(&mut out, &[&memo], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("[serif]"));
        assert!(text.contains("first line second line"));

        let mut out = Vec::new();
        write_memo_lines(&mut out, &[&memo], true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }
}
