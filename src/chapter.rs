use std::fmt;

/// Id given to extra chapters (`番外：...`). Sorts before every numbered chapter.
pub const EXTRA_CHAPTER_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: i64,
    pub title: String,
    pub lines: Vec<String>,
}

impl Chapter {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn extra(title: impl Into<String>) -> Self {
        Self::new(EXTRA_CHAPTER_ID, title)
    }

    pub fn is_extra(&self) -> bool {
        self.id == EXTRA_CHAPTER_ID
    }

    /// Display form used for the section heading and table of contents:
    /// `"<id> <title>"`, or just the title for extra chapters.
    pub fn heading(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extra() {
            f.write_str(&self.title)
        } else {
            write!(f, "{} {}", self.id, self.title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_heading() {
        assert_eq!(Chapter::new(12, "重逢").heading(), "12 重逢");
    }

    #[test]
    fn extra_heading_has_no_number() {
        let chapter = Chapter::extra("番外：旧事");
        assert!(chapter.is_extra());
        assert_eq!(chapter.heading(), "番外：旧事");
    }
}
