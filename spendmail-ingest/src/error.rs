//! Failures that abort processing of a single message.
//!
//! Recoverable problems (unmatched field, unparseable amount) never show up
//! here; they are logged and defaulted instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unable to decode message payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("unable to read MIME envelope: {0}")]
    Mime(#[from] mailparse::MailParseError),

    #[error("unable to extract message body: {0}")]
    BodyExtraction(#[source] mailparse::MailParseError),

    #[error("unable to parse Date header {header:?}: {source}")]
    Timestamp {
        header: String,
        source: chrono::ParseError,
    },

    #[error("invalid {provider} pattern: {source}")]
    Pattern {
        provider: &'static str,
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
