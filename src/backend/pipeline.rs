//! Transcribe-then-summarize pipeline

use async_trait::async_trait;
use tracing::{debug, info};

use super::{Generator, ProcessingError, Summarizer, Transcriber};

/// Returned in place of a summary when the audio contains no recognisable speech
pub const NO_TRANSCRIPTION: &str = "No transcription available";

/// [`Summarizer`] that transcribes audio and asks a generator to summarize it
#[derive(Debug, Clone)]
pub struct TranscribeAndSummarize<T, G> {
    transcriber: T,
    generator: G,
}

impl<T, G> TranscribeAndSummarize<T, G>
where
    T: Transcriber,
    G: Generator,
{
    pub fn new(transcriber: T, generator: G) -> Self {
        Self {
            transcriber,
            generator,
        }
    }
}

#[async_trait]
impl<T, G> Summarizer for TranscribeAndSummarize<T, G>
where
    T: Transcriber,
    G: Generator,
{
    async fn summarize(&self, locator: &str) -> Result<String, ProcessingError> {
        let transcript = self.transcriber.transcribe(locator).await?;
        if transcript.trim().is_empty() {
            info!(locator, "no speech recognised");
            return Ok(NO_TRANSCRIPTION.to_string());
        }

        debug!(locator, chars = transcript.len(), "transcribed audio");
        let prompt = format!("Summarize this audio transcription:\n\n{}", transcript);
        self.generator.generate(&prompt).await
    }
}
