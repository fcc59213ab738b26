use std::fs;
use std::path::PathBuf;

use crate::args::Options;
use crate::epub::{EpubBuilder, build_epub};
use crate::novel::Novel;
use crate::outline::render_outline;
use crate::{decode, parser};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::info;

#[derive(Debug)]
pub struct App {
    file_path: PathBuf,
    output: Option<PathBuf>,
    title: Option<String>,
    encoding: Option<String>,
    language: String,
    dry_run: bool,
    width: usize,
}

impl App {
    pub fn new(args: Options) -> Self {
        Self {
            file_path: args.file_path,
            output: args.output,
            title: args.title,
            encoding: args.encoding,
            language: args.language,
            dry_run: args.dry_run,
            width: args.width,
        }
    }

    fn load_file(&self) -> Result<String> {
        let bytes = fs::read(&self.file_path)
            .wrap_err_with(|| format!("cannot open {}", self.file_path.display()))?;
        let text = decode::decode_text(&bytes, self.encoding.as_deref())?;
        Ok(text.into_owned())
    }

    /// Parse the input and either print its outline or write the EPUB.
    /// Returns the written path, if any.
    pub fn run(&self) -> Result<Option<PathBuf>> {
        info!("processing {}...", self.file_path.display());
        let text = self.load_file()?;

        info!("parsing...");
        let (mut novel, report) = parser::parse_novel(&text);
        info!(
            lines = report.lines,
            chapters = novel.chapters.len(),
            unknown = report.unknown.len(),
            "parse: done"
        );
        novel.sort_chapters();

        let fallback = self.fallback_title();
        if novel.title.is_empty() {
            info!("novel doesn't have a title, use {} instead", fallback);
        }
        let title = novel.title_or(&fallback).to_string();

        if self.dry_run {
            print!("{}", render_outline(&novel, &title, self.width));
            return Ok(None);
        }

        info!("converting to epub...");
        let epub = self.convert(&novel, &title)?;
        info!("convert: done");

        let output = self.output_path(&title);
        info!("writing {} to disk...", output.display());
        epub.write(&output)
            .wrap_err_with(|| format!("cannot write {}", output.display()))?;
        info!("write: done");
        info!("process: done");

        Ok(Some(output))
    }

    fn convert(&self, novel: &Novel, title: &str) -> Result<EpubBuilder> {
        let mut epub = build_epub(title, &novel.author, &novel.sections())?;
        epub.set_language(&self.language);
        Ok(epub)
    }

    fn fallback_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        self.file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }

    fn output_path(&self, title: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(output_file_name(title)),
        }
    }
}

/// `<title>.epub`, with characters that cannot appear in a file name replaced.
fn output_file_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}.epub", name.trim())
}
