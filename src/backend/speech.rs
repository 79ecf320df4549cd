//! Google Cloud Speech-to-Text transcriber

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::extract::media_extension;

use super::{check_status, ProcessingError, Transcriber};

const SERVICE: &str = "speech-to-text";

/// Synchronous recognition rejects inline audio above this size
pub const MAX_INLINE_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Transcribes audio with the Speech-to-Text v1 `speech:recognize` method
///
/// `gs://` locators are passed to the API by URI. Any other locator is
/// downloaded and sent inline, base64-encoded.
#[derive(Debug, Clone)]
pub struct GoogleSpeechTranscriber {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    language_code: String,
}

impl GoogleSpeechTranscriber {
    pub const DEFAULT_ENDPOINT: &'static str = "https://speech.googleapis.com";

    /// Create a transcriber against the public Google endpoint
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        language_code: impl Into<String>,
    ) -> Result<Self, ProcessingError> {
        Ok(Self {
            client,
            endpoint: Url::parse(Self::DEFAULT_ENDPOINT)?,
            api_key: api_key.into(),
            language_code: language_code.into(),
        })
    }

    /// Point the transcriber at a different API host
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn recognize_url(&self) -> Result<Url, ProcessingError> {
        let mut url = self.endpoint.join("v1/speech:recognize")?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn audio_source(&self, locator: &str) -> Result<RecognitionAudio, ProcessingError> {
        if locator.starts_with("gs://") {
            return Ok(RecognitionAudio::Uri(locator.to_string()));
        }

        let download_error = |reason: String| ProcessingError::Download {
            locator: locator.to_string(),
            reason,
        };

        let too_large = |size: u64| {
            download_error(format!(
                "{size} bytes exceeds the {MAX_INLINE_AUDIO_BYTES} byte limit"
            ))
        };

        let mut response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_INLINE_AUDIO_BYTES as u64 {
                return Err(too_large(length));
            }
        }

        // Content-Length may be absent or wrong; enforce the limit while reading
        let mut bytes = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_error(e.to_string()))?
        {
            let size = bytes.len() + chunk.len();
            if size > MAX_INLINE_AUDIO_BYTES {
                return Err(too_large(size as u64));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(locator, bytes = bytes.len(), "downloaded audio");
        Ok(RecognitionAudio::Content(
            general_purpose::STANDARD.encode(&bytes),
        ))
    }
}

#[async_trait]
impl Transcriber for GoogleSpeechTranscriber {
    async fn transcribe(&self, locator: &str) -> Result<String, ProcessingError> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: encoding_for(locator),
                language_code: &self.language_code,
                enable_automatic_punctuation: true,
            },
            audio: self.audio_source(locator).await?,
        };

        let response = self
            .client
            .post(self.recognize_url()?)
            .json(&request)
            .send()
            .await
            .map_err(ProcessingError::http(SERVICE))?;

        let body: RecognizeResponse = check_status(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ProcessingError::http(SERVICE))?;

        Ok(body.transcript())
    }
}

/// Speech-to-Text encoding name for a locator's extension
///
/// WAV and FLAC carry their encoding in the header but naming it is harmless.
/// Unknown extensions are left for the API to detect.
fn encoding_for(locator: &str) -> Option<&'static str> {
    match media_extension(locator)? {
        "flac" => Some("FLAC"),
        "wav" => Some("LINEAR16"),
        "ogg" => Some("OGG_OPUS"),
        "mp3" => Some("MP3"),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'static str>,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum RecognitionAudio {
    Uri(String),
    Content(String),
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of every result, joined by spaces
    fn transcript(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|alt| alt.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
