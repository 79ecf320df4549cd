use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tower_a2a_audio::{
    backend::{GeminiGenerator, GoogleSpeechTranscriber, TranscribeAndSummarize},
    config::ServerConfig,
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let api_key = config.require_api_key()?.to_string();

    let client = reqwest::Client::builder()
        .timeout(config.backend_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let transcriber =
        GoogleSpeechTranscriber::new(client.clone(), api_key.clone(), &config.language_code)?;
    let generator = GeminiGenerator::new(client, api_key, &config.gemini_model)?;

    info!(
        agent = %config.agent_name,
        model = %config.gemini_model,
        language = %config.language_code,
        "starting audio agent"
    );

    server::serve(config, Arc::new(TranscribeAndSummarize::new(transcriber, generator))).await
}
