//! Agent Card published for discovery

use crate::{
    config::ServerConfig,
    protocol::agent::{AgentCapabilities, AgentCard, AgentProvider, AgentSkill},
};

const DESCRIPTION: &str = "An AI agent that analyzes and transcribes audio files, providing \
insights such as speech-to-text conversion and sentiment analysis.";

const AUDIO_IN: &[&str] = &["audio"];
const TEXT_OUT: &[&str] = &["text", "markdown"];

/// Build the Agent Card for this process
///
/// The card is static for the lifetime of the server; it only varies with the
/// configured identity and public URL.
pub fn build_agent_card(config: &ServerConfig) -> AgentCard {
    let base_url = config.public_url();

    AgentCard::new(
        &config.agent_name,
        DESCRIPTION,
        &base_url,
        env!("CARGO_PKG_VERSION"),
    )
    .with_provider(AgentProvider {
        organization: config.agent_organization.clone(),
        url: base_url.clone(),
    })
    .with_documentation_url(format!("{base_url}/docs"))
    .with_capabilities(AgentCapabilities::new().with_state_transition_history())
    .with_default_modes(AUDIO_IN, TEXT_OUT)
    .with_skill(
        AgentSkill::new(
            "transcribe_audio",
            "Transcribe Audio",
            "Convert speech to text and analyze the sentiment or tone of the conversation.",
            AUDIO_IN,
            TEXT_OUT,
        )
        .with_examples(&[
            "Transcribe this audio clip.",
            "What is being discussed in this recording?",
            "Summarize this podcast episode.",
        ]),
    )
    .with_skill(
        AgentSkill::new(
            "analyze_audio",
            "Analyze Audio",
            "Detect emotions, classify speakers, and provide insights from audio content.",
            AUDIO_IN,
            TEXT_OUT,
        )
        .with_examples(&[
            "Analyze the emotions in this audio file.",
            "Who sounds angry or happy in this recording?",
        ]),
    )
}
