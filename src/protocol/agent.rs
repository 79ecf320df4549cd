//! Agent discovery and capability types

use serde::{Deserialize, Serialize};

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent.json` and describes the
/// agent's identity, the modes it accepts and produces, and its skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Base URL of the JSON-RPC endpoint
    pub url: String,

    /// Organization operating the agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,

    /// Agent version
    pub version: String,

    /// URL to agent documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    /// Input modes accepted by every skill unless overridden
    pub default_input_modes: Vec<String>,

    /// Output modes produced by every skill unless overridden
    pub default_output_modes: Vec<String>,

    /// Skill catalog
    pub skills: Vec<AgentSkill>,

    #[serde(default)]
    pub supports_authenticated_extended_card: bool,
}

impl AgentCard {
    /// Create a new agent card
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            provider: None,
            version: version.into(),
            documentation_url: None,
            capabilities: AgentCapabilities::default(),
            default_input_modes: Vec::new(),
            default_output_modes: Vec::new(),
            skills: Vec::new(),
            supports_authenticated_extended_card: false,
        }
    }

    /// Set the provider
    pub fn with_provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the documentation URL
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Set the capabilities
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the default input and output modes
    pub fn with_default_modes(mut self, input: &[&str], output: &[&str]) -> Self {
        self.default_input_modes = modes(input);
        self.default_output_modes = modes(output);
        self
    }

    /// Add a skill to the catalog
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }
}

/// Organization operating an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentProvider {
    pub organization: String,
    pub url: String,
}

/// Agent capabilities
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Supports push notifications via webhooks
    #[serde(default)]
    pub push_notifications: bool,

    /// Keeps the full state transition history of tasks
    #[serde(default)]
    pub state_transition_history: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable state transition history
    pub fn with_state_transition_history(mut self) -> Self {
        self.state_transition_history = true;
        self
    }
}

/// A skill advertised in the Agent Card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub input_modes: Vec<String>,
    pub output_modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl AgentSkill {
    /// Create a skill with the given modes and no examples
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        input_modes: &[&str],
        output_modes: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            input_modes: modes(input_modes),
            output_modes: modes(output_modes),
            examples: Vec::new(),
        }
    }

    /// Add example prompts
    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples.extend(examples.iter().map(|e| e.to_string()));
        self
    }
}

fn modes(modes: &[&str]) -> Vec<String> {
    modes.iter().map(|m| m.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_card_creation() {
        let card = AgentCard::new("Test Agent", "A test agent", "https://example.com", "1.0.0")
            .with_capabilities(AgentCapabilities::new().with_state_transition_history())
            .with_default_modes(&["audio"], &["text"])
            .with_skill(
                AgentSkill::new("s1", "Skill", "Does things", &["audio"], &["text"])
                    .with_examples(&["Do the thing."]),
            );

        assert_eq!(card.name, "Test Agent");
        assert!(card.capabilities.state_transition_history);
        assert!(!card.capabilities.streaming);
        assert_eq!(card.default_input_modes, vec!["audio"]);
        assert_eq!(card.skills.len(), 1);
        assert_eq!(card.skills[0].examples.len(), 1);
    }

    #[test]
    fn test_agent_card_serialization() {
        let card = AgentCard::new("Test", "Description", "https://example.com", "1.0.0")
            .with_provider(AgentProvider {
                organization: "Org".to_string(),
                url: "https://example.com".to_string(),
            });

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "Test");
        assert_eq!(json["provider"]["organization"], "Org");
        assert_eq!(json["capabilities"]["stateTransitionHistory"], false);
        assert_eq!(json["supportsAuthenticatedExtendedCard"], false);
        assert!(json.get("documentationUrl").is_none());

        let deserialized: AgentCard = serde_json::from_value(json).unwrap();
        assert_eq!(card, deserialized);
    }
}
