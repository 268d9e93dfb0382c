use std::error::Error as _;

use rusoto_core::RusotoError;
use rusoto_sns::PublishError;
use thiserror::Error;

use crate::listen::InvalidReason;

/// Enumerates errors returned by this library.
#[derive(Debug, Error)]
pub enum ListensError {
    /// The listener's timezone isn't in the IANA database.
    #[error("Invalid IANA timezone {0:?}.")]
    InvalidIanaTimezone(String),

    /// The catalog has no such song.
    #[error("Song {0} doesnt exist.")]
    InvalidSong(String),

    /// A listen was submitted while the sun was down.
    #[error("Listens can only be submitted during the day.")]
    Sunlight,

    /// The sunlight service couldn't answer.
    #[error("Sunlight service error: {message}")]
    SunlightService { message: String },

    #[error("Listen with id {0} doesnt exist.")]
    ListenDoesntExist(String),

    /// A submission failed the field checks.
    #[error("Invalid listen.")]
    InvalidInput(InvalidReason),

    /// The request couldn't be decoded.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No use-case handles this method and path.
    #[error("Unexpected route {method} {path}")]
    UnexpectedRoute { method: String, path: String },

    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    #[error("HTTP client error")]
    Http { source: reqwest::Error },

    #[error("Unexpected response from catalog ({status}): {body}")]
    UnexpectedCatalogResponse { status: u16, body: String },

    #[error("Failed to publish notification")]
    Publish { source: RusotoError<PublishError> },

    #[error("Failed to encode notification")]
    Encoding { source: serde_json::Error },

    #[error("Cannot build request URLs from {url}")]
    InvalidEndpoint { url: String },
}

/// What an error means to whoever made the request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The request was wrong and shouldn't be retried as is.
    ClientError,

    /// The request would succeed under other circumstances (in daylight).
    PreconditionRequired,

    NotFound,

    /// Something broke; the details are for the logs only.
    Fatal,
}

impl ListensError {
    /// Whether this is one of the business-rule failures, as opposed to
    /// a transport or infrastructure failure.
    pub fn is_domain(&self) -> bool {
        use ListensError::*;

        matches!(
            self,
            InvalidIanaTimezone(..)
                | InvalidSong(..)
                | Sunlight
                | SunlightService { .. }
                | ListenDoesntExist(..)
        )
    }

    pub fn outcome(&self) -> Outcome {
        use ListensError::*;

        match self {
            InvalidIanaTimezone(..) | InvalidSong(..) => Outcome::ClientError,
            InvalidInput(..) | MalformedRequest(..) => Outcome::ClientError,
            Sunlight => Outcome::PreconditionRequired,
            ListenDoesntExist(..) => Outcome::NotFound,
            SunlightService { .. }
            | UnexpectedRoute { .. }
            | Sqlx { .. }
            | Http { .. }
            | UnexpectedCatalogResponse { .. }
            | Publish { .. }
            | Encoding { .. }
            | InvalidEndpoint { .. } => Outcome::Fatal,
        }
    }

    /// Renders the error and every error beneath it, outermost first.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = self.source();

        while let Some(e) = source {
            rendered.push_str(": ");
            rendered.push_str(&e.to_string());
            source = e.source();
        }

        rendered
    }
}

pub(crate) fn http_error(source: reqwest::Error) -> ListensError {
    ListensError::Http { source }
}
