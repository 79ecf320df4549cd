//! Processing backends
//!
//! The agent hands a resolved resource locator to a [`Summarizer`] and records
//! whatever comes back on the task. The shipped summarizer transcribes the audio
//! with Google Speech-to-Text and summarizes the transcript with Gemini.

pub mod gemini;
pub mod pipeline;
pub mod speech;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiGenerator;
pub use pipeline::TranscribeAndSummarize;
pub use speech::GoogleSpeechTranscriber;

/// Turns a resource locator into a text summary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, locator: &str) -> Result<String, ProcessingError>;
}

/// Turns a resource locator into a transcript
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns an empty string when no speech was recognised
    async fn transcribe(&self, locator: &str) -> Result<String, ProcessingError>;
}

/// Generates text from a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProcessingError>;
}

/// Failure of a processing backend
///
/// The lifecycle does not distinguish variants; the Display text is shown to
/// the caller in the failure notice.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Request could not be sent or its body not read
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success status
    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Audio could not be fetched from its locator
    #[error("could not download audio from {locator}: {reason}")]
    Download { locator: String, reason: String },

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("failed to generate summary: {0}")]
    Generation(String),

    #[error("{0}")]
    Other(String),
}

impl ProcessingError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ProcessingError::Http { service, source }
    }
}

impl From<&str> for ProcessingError {
    fn from(s: &str) -> Self {
        ProcessingError::Other(s.to_string())
    }
}

/// Pull a human-readable message out of an error response body
///
/// Google APIs answer `{"error": {"message": ..}}`; other services often use a
/// top-level `message`. Anything else is returned trimmed and truncated.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let message = json
            .pointer("/error/message")
            .or_else(|| json.get("message"))
            .and_then(|v| v.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = body.trim();
    match body.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Check a response status, turning failures into [`ProcessingError::Status`]
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProcessingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProcessingError::Status {
        service,
        status: status.as_u16(),
        message: error_message(&body),
    })
}
