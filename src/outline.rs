//! Plain-text table of contents for `--dry-run`.

use std::fmt::Write;

use textwrap::Options;

use crate::novel::Novel;

pub const DEFAULT_WIDTH: usize = 80;

/// Render title, author and one wrapped entry per chapter, in the order the
/// chapters currently have.
pub fn render_outline(novel: &Novel, title: &str, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    if !novel.author.is_empty() {
        let _ = writeln!(out, "作者：{}", novel.author);
    }
    let _ = writeln!(out, "{} chapters", novel.chapters.len());
    out.push('\n');

    let options = Options::new(width.max(8))
        .initial_indent("  ")
        .subsequent_indent("      ");
    for chapter in &novel.chapters {
        let entry = format!("{} ({} paragraphs)", chapter.heading(), chapter.lines.len());
        out.push_str(&textwrap::fill(&entry, &options));
        out.push('\n');
    }
    out
}
