use thiserror::Error;

/// Why a lookup produced no lyrics. The display text is shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LyricsError {
    #[error("song not found, try rephrasing")]
    NotFound,

    #[error("page not found (status {status})")]
    UpstreamUnavailable { status: u16 },

    #[error("lyrics not found on page")]
    ExtractionFailed,

    #[error("error during search: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LyricsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
