use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    #[diagnostic(
        code(debferry_dl::network),
        help("Check your internet connection or try again later")
    )]
    Network(#[from] Box<ureq::Error>),

    #[error("HTTP {status}: {url}")]
    #[diagnostic(code(debferry_dl::http_error))]
    HttpStatus { status: u16, url: String },

    #[error(transparent)]
    #[diagnostic(code(debferry_dl::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {codec} stream from {url}: {source}")]
    #[diagnostic(
        code(debferry_dl::decompress),
        help("The mirror may be serving a corrupt or mislabeled file")
    )]
    Decompress {
        codec: &'static str,
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File name could not be determined for {url}")]
    #[diagnostic(code(debferry_dl::no_filename))]
    NoFilename { url: String },

    #[error(transparent)]
    #[diagnostic(code(debferry_dl::filesystem))]
    FileSystem(#[from] debferry_utils::error::FileSystemError),
}

impl From<ureq::Error> for DownloadError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;
