//! Gemini text generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{check_status, Generator, ProcessingError};

const SERVICE: &str = "gemini";

/// System instruction given to the model for every summary
pub const SUMMARY_INSTRUCTIONS: &str = "You are an assistant that summarizes audio recordings. \
You are given the transcription of a recording. Summarize it clearly and concisely, \
keeping the key points, decisions and any action items.";

/// Generates text with the Gemini `generateContent` method
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    instructions: String,
}

impl GeminiGenerator {
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a generator for `model` with the summary instructions
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProcessingError> {
        Ok(Self {
            client,
            endpoint: Url::parse(Self::DEFAULT_ENDPOINT)?,
            api_key: api_key.into(),
            model: model.into(),
            instructions: SUMMARY_INSTRUCTIONS.to_string(),
        })
    }

    /// Point the generator at a different API host
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Replace the system instruction
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    fn generate_url(&self) -> Result<Url, ProcessingError> {
        let mut url = self
            .endpoint
            .join(&format!("v1beta/models/{}:generateContent", self.model))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProcessingError> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![TextPart {
                    text: &self.instructions,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url()?)
            .json(&request)
            .send()
            .await
            .map_err(ProcessingError::http(SERVICE))?;

        let body: GenerateContentResponse = check_status(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ProcessingError::http(SERVICE))?;

        body.text()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate
    fn text(self) -> Result<String, ProcessingError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProcessingError::Generation(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProcessingError::Generation(
                "model returned no text".into(),
            ));
        }
        Ok(text.trim().to_string())
    }
}
