//! Error types for verse extraction and chapter retrieval.

use std::path::PathBuf;

use thiserror::Error;

/// The chapter text could not be turned into verses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedInput {
    /// A `\u` escape carried a code outside the known punctuation table.
    #[error("unknown escape code \\u{code} at byte {offset}")]
    UnknownEscape { code: String, offset: usize },

    /// The `"parsed": [[first, last]]` anchor is not in the text.
    #[error("chapter range marker not found")]
    MissingChapterRange,

    /// The anchor was found but the last verse could not be read from it.
    #[error("chapter range marker is unreadable: {found:?}")]
    InvalidChapterRange { found: String },
}

/// The raw chapter text or the credential needed to fetch it is unavailable.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No token in the environment and none in the token file.
    #[error("no API token found (set ESV_API_TOKEN or write one to {})", path.display())]
    MissingCredential { path: PathBuf },

    /// The passage API answered with a non-success status.
    #[error("passage API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
