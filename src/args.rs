use clap::Parser;
use std::path::PathBuf;

use crate::outline::DEFAULT_WIDTH;

#[derive(Parser, Debug)]
#[command(version, about = "Convert a chapter-formatted novel from plain text to EPUB")]
pub struct Options {
    /// Input text file
    pub file_path: PathBuf,

    /// Output path (defaults to "<title>.epub" in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title to use when the text has no 《title》 header (defaults to the file name)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Input encoding label, e.g. gbk; detected when omitted
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Book language written to the package metadata
    #[arg(short, long, default_value = "zh")]
    pub language: String,

    /// Parse and print the table of contents without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Wrap width of the printed table of contents
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
