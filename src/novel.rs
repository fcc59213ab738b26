//! The document accumulated while parsing a novel.

use crate::chapter::Chapter;

/// A section handed to the packager: chapter heading plus body paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Novel {
    pub title: String,
    pub author: String,
    pub chapters: Vec<Chapter>,
}

impl Novel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace title and author. Later title headers overwrite earlier ones.
    pub fn set_head(&mut self, title: impl Into<String>, author: impl Into<String>) {
        self.title = title.into();
        self.author = author.into();
    }

    pub fn push_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Append a body line to the most recent chapter.
    ///
    /// Returns `false` when there is no chapter yet; the line is dropped.
    pub fn push_line(&mut self, line: impl Into<String>) -> bool {
        match self.chapters.last_mut() {
            Some(chapter) => {
                chapter.lines.push(line.into());
                true
            }
            None => false,
        }
    }

    /// Order chapters by id. Stable, so extras and duplicate ids keep input order.
    pub fn sort_chapters(&mut self) {
        self.chapters.sort_by_key(|chapter| chapter.id);
    }

    pub fn sections(&self) -> Vec<Section> {
        self.chapters
            .iter()
            .map(|chapter| Section {
                heading: chapter.heading(),
                paragraphs: chapter.lines.clone(),
            })
            .collect()
    }

    /// The parsed title, or `fallback` when no title header was seen.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}
