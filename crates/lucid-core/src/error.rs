use thiserror::Error;

/// Core error type for lucid operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] lucid_syntax::ParseError),

    #[error("Malformed suggestion response for `{function}`; raw response follows: {raw}")]
    MalformedResponse { function: String, raw: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Suggestion API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
