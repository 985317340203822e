//! Retrieval of raw chapter text and the credential needed to fetch it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, instrument};

use crate::error::SourceError;

pub const DEFAULT_API_URL: &str = "https://api.esv.org/v3/passage/text/";
pub const TOKEN_ENV_VAR: &str = "ESV_API_TOKEN";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Query flags: verse numbers on (they are the segmentation markers),
/// everything else that would pollute the verse text off.
const PASSAGE_OPTIONS: [(&str, &str); 6] = [
    ("include-headings", "False"),
    ("include-footnotes", "False"),
    ("include-verse-numbers", "True"),
    ("include-short-copyright", "False"),
    ("include-passage-references", "False"),
    ("include-first-verse-numbers", "True"),
];

/// Anything that can hand over the raw text of one chapter.
pub trait PassageSource {
    fn fetch(&self) -> Result<String, SourceError>;
}

/// Value for the `Authorization` header, e.g. `Token abc123`.
///
/// Debug output masks the value so it never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Resolve the API token: the environment variable wins, then the first line
/// of `token_file`.
pub fn load_token(token_file: &Path) -> Result<ApiToken, SourceError> {
    if let Ok(value) = std::env::var(TOKEN_ENV_VAR) {
        if !value.trim().is_empty() {
            return Ok(ApiToken::new(value.trim()));
        }
    }
    read_token_file(token_file)
}

/// Read the token from the first line of `path`, dropping only its line ending.
pub fn read_token_file(path: &Path) -> Result<ApiToken, SourceError> {
    let missing = || SourceError::MissingCredential {
        path: path.to_path_buf(),
    };
    let contents = fs::read_to_string(path).map_err(|_| missing())?;
    let first = contents.lines().next().unwrap_or_default();
    if first.trim().is_empty() {
        return Err(missing());
    }
    Ok(ApiToken::new(first))
}

/// Fetches a passage from the ESV text endpoint.
pub struct EsvSource {
    api_url: String,
    passage: String,
    token: ApiToken,
}

impl EsvSource {
    pub fn new(api_url: impl Into<String>, passage: impl Into<String>, token: ApiToken) -> Self {
        Self {
            api_url: api_url.into(),
            passage: passage.into(),
            token,
        }
    }

    pub fn query(&self) -> Vec<(&str, &str)> {
        let mut query = vec![("q", self.passage.as_str())];
        query.extend(PASSAGE_OPTIONS);
        query
    }
}

impl PassageSource for EsvSource {
    #[instrument(skip(self), fields(passage = %self.passage))]
    fn fetch(&self) -> Result<String, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        info!(url = %self.api_url, "fetching passage");
        let response = client
            .get(&self.api_url)
            .query(&self.query())
            .header(reqwest::header::AUTHORIZATION, self.token.as_str())
            .send()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        info!(bytes = body.len(), "passage received");
        Ok(body)
    }
}

/// Reads a previously saved response (or hand-written chapter) from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PassageSource for FileSource {
    fn fetch(&self) -> Result<String, SourceError> {
        fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
