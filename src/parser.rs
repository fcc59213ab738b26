//! Line classification.
//!
//! A novel is read one line at a time. The first character decides what a
//! line can be:
//!
//! - `《书名》 - 作者：某人` sets title and author
//! - a line indented with an ASCII or ideographic space is body text
//! - `第十二章 标题` / `第12章 标题` opens a numbered chapter
//! - `番外：...` opens an extra chapter
//!
//! Everything else is unknown. Body text right after an unknown line is
//! skipped until the next valid header.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::chapter::Chapter;
use crate::novel::Novel;
use crate::numeral::{NumeralError, is_numeral_char, parse_chapter_number};

const TITLE_OPEN: char = '《';
const TITLE_CLOSE: char = '》';
const AUTHOR_SEPARATOR: &str = " - 作者：";
const CHAPTER_PREFIX: char = '第';
const CHAPTER_SUFFIX: char = '章';
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

static EXTRA_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^番外：.*").expect("extra chapter pattern is valid"));

/// What a single line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Zero-length line.
    Empty,
    /// Title/author header.
    Head,
    /// `《` without a matching `》`.
    UnclosedTitle,
    /// Body line appended to the current chapter.
    Content,
    /// Indented line with nothing but whitespace.
    BlankContent,
    /// Body line seen before any chapter; dropped.
    OrphanContent,
    /// Body line following an unknown line; skipped.
    WaitingForHeader,
    /// Numbered chapter header.
    Chapter,
    /// `第` not followed by a number and `章`.
    InvalidChapterHeader,
    /// Chapter number could not be parsed.
    BadChapterNumber(NumeralError),
    /// `番外：` header.
    ExtraChapter,
    Unknown,
}

impl LineKind {
    /// Whether the line counts as unrecognized for the caller.
    ///
    /// `ExtraChapter` reports `true` even though the chapter was added, so
    /// the indented lines right after an extra chapter header are skipped.
    pub fn is_unknown(&self) -> bool {
        matches!(
            self,
            LineKind::Empty
                | LineKind::UnclosedTitle
                | LineKind::WaitingForHeader
                | LineKind::InvalidChapterHeader
                | LineKind::BadChapterNumber(_)
                | LineKind::ExtraChapter
                | LineKind::Unknown
        )
    }
}

/// Classify `line`, applying its effect to `novel`.
///
/// `last_unknown` is the result of [`LineKind::is_unknown`] for the previous line.
pub fn classify_line(line: &str, novel: &mut Novel, last_unknown: bool) -> LineKind {
    let Some(first) = line.chars().next() else {
        return LineKind::Empty;
    };

    match first {
        TITLE_OPEN => parse_head(&line[TITLE_OPEN.len_utf8()..], novel),
        ' ' | IDEOGRAPHIC_SPACE => parse_content(line, novel, last_unknown),
        CHAPTER_PREFIX => parse_chapter(&line[CHAPTER_PREFIX.len_utf8()..], novel),
        _ if EXTRA_CHAPTER.is_match(line) => {
            novel.push_chapter(Chapter::extra(line));
            LineKind::ExtraChapter
        }
        _ => LineKind::Unknown,
    }
}

/// Classify `line` and report only whether it was unrecognized.
pub fn parse_line(line: &str, novel: &mut Novel, last_unknown: bool) -> bool {
    classify_line(line, novel, last_unknown).is_unknown()
}

fn parse_head(rest: &str, novel: &mut Novel) -> LineKind {
    let Some(end) = rest.find(TITLE_CLOSE) else {
        debug!("novel title doesn't have matched angle quotation marks");
        return LineKind::UnclosedTitle;
    };

    let title = &rest[..end];
    let after = &rest[end + TITLE_CLOSE.len_utf8()..];
    let author = after.strip_prefix(AUTHOR_SEPARATOR).unwrap_or_default();
    if author.is_empty() {
        debug!(title, "novel doesn't have an author");
    }

    novel.set_head(title, author);
    LineKind::Head
}

fn parse_content(line: &str, novel: &mut Novel, last_unknown: bool) -> LineKind {
    if last_unknown {
        debug!("waiting for next valid header");
        return LineKind::WaitingForHeader;
    }

    let text = line.trim_start_matches([' ', '\t', IDEOGRAPHIC_SPACE]);
    if text.is_empty() {
        debug!("empty line in content");
        return LineKind::BlankContent;
    }

    if novel.push_line(text) {
        LineKind::Content
    } else {
        debug!("content before the first chapter, dropped");
        LineKind::OrphanContent
    }
}

fn parse_chapter(rest: &str, novel: &mut Novel) -> LineKind {
    let run_len = rest.find(|c| !is_numeral_char(c)).unwrap_or(rest.len());
    let (run, after) = rest.split_at(run_len);

    if run.is_empty() || !after.starts_with(CHAPTER_SUFFIX) {
        debug!("invalid title of chapter");
        return LineKind::InvalidChapterHeader;
    }

    let digits: Vec<char> = run.chars().collect();
    let id = match parse_chapter_number(&digits) {
        Ok(id) => id,
        Err(err) => {
            debug!(%err, "cannot parse id of chapter");
            return LineKind::BadChapterNumber(err);
        }
    };

    // skip the suffix and the separator after it
    let mut title = after.chars();
    title.nth(1);

    novel.push_chapter(Chapter::new(id, title.as_str()));
    LineKind::Chapter
}

/// An input line that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLine {
    /// 1-based line number.
    pub number: usize,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub lines: usize,
    pub unknown: Vec<UnknownLine>,
}

/// Feed every line into `novel`, threading the unknown-line state.
pub fn parse_lines<I, S>(lines: I, novel: &mut Novel) -> ParseReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ParseReport::default();
    let mut last_unknown = false;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let number = index + 1;
        last_unknown = parse_line(line, novel, last_unknown);
        if last_unknown {
            warn!("unknown line {}: {}", number, line);
            report.unknown.push(UnknownLine {
                number,
                content: line.to_string(),
            });
        }
        report.lines = number;
    }

    report
}

/// Parse a whole text into a fresh [`Novel`]. Chapters are left in input order.
pub fn parse_novel(text: &str) -> (Novel, ParseReport) {
    let mut novel = Novel::new();
    let report = parse_lines(text.lines(), &mut novel);
    (novel, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(lines: &[&str]) -> (Novel, Vec<LineKind>) {
        let mut novel = Novel::new();
        let mut last_unknown = false;
        let kinds = lines
            .iter()
            .map(|line| {
                let kind = classify_line(line, &mut novel, last_unknown);
                last_unknown = kind.is_unknown();
                kind
            })
            .collect();
        (novel, kinds)
    }

    #[test]
    fn title_and_author() {
        let (novel, kinds) = classify(&["《My Book》 - 作者：Jane"]);
        assert_eq!(kinds, [LineKind::Head]);
        assert_eq!(novel.title, "My Book");
        assert_eq!(novel.author, "Jane");
    }

    #[test]
    fn title_without_author() {
        let (novel, _) = classify(&["《My Book》"]);
        assert_eq!(novel.title, "My Book");
        assert_eq!(novel.author, "");

        let (novel, _) = classify(&["《My Book》 by Jane"]);
        assert_eq!(novel.title, "My Book");
        assert_eq!(novel.author, "");
    }

    #[test]
    fn second_title_header_overwrites() {
        let (novel, _) = classify(&["《A》 - 作者：X", "《B》"]);
        assert_eq!(novel.title, "B");
        assert_eq!(novel.author, "");
    }

    #[test]
    fn unclosed_title_is_unknown() {
        let (novel, kinds) = classify(&["《My Book"]);
        assert_eq!(kinds, [LineKind::UnclosedTitle]);
        assert!(kinds[0].is_unknown());
        assert_eq!(novel, Novel::new());
    }

    #[test]
    fn empty_line_is_unknown() {
        let mut novel = Novel::new();
        assert!(parse_line("", &mut novel, false));
        assert_eq!(novel, Novel::new());
    }

    #[test]
    fn chapter_headers() {
        let (novel, kinds) = classify(&["第一章 Intro", "第12章 Twelve", "第一百零五章 Far"]);
        assert_eq!(kinds, [LineKind::Chapter, LineKind::Chapter, LineKind::Chapter]);
        let heads: Vec<(i64, &str)> = novel
            .chapters
            .iter()
            .map(|c| (c.id, c.title.as_str()))
            .collect();
        assert_eq!(heads, [(1, "Intro"), (12, "Twelve"), (105, "Far")]);
    }

    #[test]
    fn chapter_title_skips_one_character_after_suffix() {
        let (novel, _) = classify(&["第三章：开端", "第四章", "第五章 "]);
        let titles: Vec<&str> = novel.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["开端", "", ""]);
    }

    #[test]
    fn invalid_chapter_headers() {
        let (novel, kinds) = classify(&["第章 nothing", "第一节 section", "第一", "第X章"]);
        assert!(kinds.iter().all(|k| *k == LineKind::InvalidChapterHeader));
        assert!(novel.chapters.is_empty());
    }

    #[test]
    fn unparsable_chapter_number() {
        let (novel, kinds) = classify(&["第1十章 mixed"]);
        assert_eq!(
            kinds,
            [LineKind::BadChapterNumber(NumeralError::NotNumeral('十'))]
        );
        assert!(novel.chapters.is_empty());
    }

    #[test]
    fn content_is_trimmed_and_appended() {
        let (novel, kinds) = classify(&["第1章 A", "　　第一段", " \t second"]);
        assert_eq!(kinds[1..], [LineKind::Content, LineKind::Content]);
        assert_eq!(novel.chapters[0].lines, ["第一段", "second"]);
    }

    #[test]
    fn blank_content_is_recognized() {
        let (novel, kinds) = classify(&["第1章 A", "　 \t"]);
        assert_eq!(kinds[1], LineKind::BlankContent);
        assert!(!kinds[1].is_unknown());
        assert!(novel.chapters[0].lines.is_empty());
    }

    #[test]
    fn orphan_content_is_dropped() {
        let (novel, kinds) = classify(&["《T》", "　lost"]);
        assert_eq!(kinds[1], LineKind::OrphanContent);
        assert!(!kinds[1].is_unknown());
        assert!(novel.chapters.is_empty());
    }

    #[test]
    fn content_after_unknown_line_is_skipped() {
        let (novel, kinds) = classify(&[
            "第1章 A",
            "第一节 bad",
            "　stray",
            "　still stray",
            "第2章 B",
            "　kept",
        ]);
        assert_eq!(kinds[2], LineKind::WaitingForHeader);
        assert_eq!(kinds[3], LineKind::WaitingForHeader);
        assert!(novel.chapters[0].lines.is_empty());
        assert_eq!(novel.chapters[1].lines, ["kept"]);
    }

    #[test]
    fn extra_chapter_is_added_but_reported_unknown() {
        let (novel, kinds) = classify(&["番外：旧事", "　lost body", "番外："]);
        assert_eq!(kinds[0], LineKind::ExtraChapter);
        assert!(kinds[0].is_unknown());
        assert_eq!(kinds[1], LineKind::WaitingForHeader);
        assert_eq!(kinds[2], LineKind::ExtraChapter);

        assert_eq!(novel.chapters.len(), 2);
        assert_eq!(novel.chapters[0], Chapter::extra("番外：旧事"));
        assert_eq!(novel.chapters[1].title, "番外：");
    }

    #[test]
    fn extra_chapter_must_start_the_line() {
        let (novel, kinds) = classify(&["后记 番外：旧事"]);
        assert_eq!(kinds, [LineKind::Unknown]);
        assert!(novel.chapters.is_empty());
    }

    #[test]
    fn parse_lines_reports_unknown_lines() {
        let mut novel = Novel::new();
        let report = parse_lines(["《T》", "noise", "　skipped", "第1章 A", ""], &mut novel);
        assert_eq!(report.lines, 5);
        let numbers: Vec<usize> = report.unknown.iter().map(|u| u.number).collect();
        assert_eq!(numbers, [2, 3, 5]);
        assert_eq!(report.unknown[0].content, "noise");
    }

    #[test]
    fn end_to_end_scenario() {
        let text = "《T》\n第一章 Intro\n　Hello world\n第2章 Two\n Second\n";
        let (mut novel, report) = parse_novel(text);
        novel.sort_chapters();

        assert!(report.unknown.is_empty());
        assert_eq!(novel.title, "T");
        assert_eq!(novel.author, "");
        assert_eq!(
            novel.chapters,
            [
                Chapter {
                    id: 1,
                    title: "Intro".to_string(),
                    lines: vec!["Hello world".to_string()],
                },
                Chapter {
                    id: 2,
                    title: "Two".to_string(),
                    lines: vec!["Second".to_string()],
                },
            ]
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "《T》 - 作者：A\n第三章 c\n　x\n番外：e\n第1章 a\n　y\nnoise\n";
        let (first, first_report) = parse_novel(text);
        let (second, second_report) = parse_novel(text);
        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
    }

    #[test]
    fn crlf_input() {
        let (novel, report) = parse_novel("《T》\r\n第1章 A\r\n　body\r\n");
        assert!(report.unknown.is_empty());
        assert_eq!(novel.chapters[0].lines, ["body"]);
    }
}
