pub mod app;
pub mod args;
pub mod chapter;
pub mod decode;
pub mod epub;
pub mod error;
pub mod novel;
pub mod numeral;
pub mod outline;
pub mod parser;

pub use chapter::{Chapter, EXTRA_CHAPTER_ID};
pub use epub::{EpubBuilder, build_epub};
pub use error::{Error, Result};
pub use novel::{Novel, Section};
pub use parser::{
    LineKind, ParseReport, UnknownLine, classify_line, parse_line, parse_lines, parse_novel,
};
