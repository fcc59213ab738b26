use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("section {0} has an empty heading")]
    EmptyHeading(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
