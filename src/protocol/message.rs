//! A2A message types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message in the A2A protocol
///
/// Messages are the unit of a conversational turn. Inbound messages are created by
/// the caller; outbound agent replies are created by the task lifecycle. Once a
/// message is appended to a task's history it is never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (defaults to `user` on input)
    #[serde(default)]
    pub role: Role,

    /// Message content parts, in order
    pub parts: Vec<Part>,

    /// Message identifier, generated by the agent when the caller omits it
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Task this message belongs to
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Context (conversation) this message belongs to
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Optional metadata for the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,

    /// Object discriminator, always `"message"`
    #[serde(default)]
    pub kind: MessageKind,
}

impl Message {
    /// Create a new message with text content
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
            message_id: None,
            task_id: None,
            context_id: None,
            metadata: None,
            kind: MessageKind::Message,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Create a new message builder
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Text of all top-level text parts, joined by newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builder for constructing Message instances
#[derive(Debug, Default)]
pub struct MessageBuilder {
    role: Option<Role>,
    parts: Vec<Part>,
    message_id: Option<String>,
    task_id: Option<String>,
    context_id: Option<String>,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role of the message
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the message parts
    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }

    /// Add a single part to the message
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Set the message ID
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Set the task ID
    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Set the context ID
    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    /// Build the message. The role defaults to `user` when unset.
    pub fn build(self) -> Message {
        Message {
            role: self.role.unwrap_or_default(),
            parts: self.parts,
            message_id: self.message_id,
            task_id: self.task_id,
            context_id: self.context_id,
            metadata: None,
            kind: MessageKind::Message,
        }
    }
}

/// Role of a message sender
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    #[default]
    User,

    /// Message from an AI agent
    Agent,
}

/// Discriminator carried by every serialized message
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Message,
}

/// A part of a message
///
/// Parts are a closed sum type discriminated by the `kind` field. A data part
/// nests further parts, so a message is a tree of content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Text content
    Text {
        text: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<HashMap<String, Value>>,
    },

    /// Reference to a file by URL
    File {
        url: String,

        /// Declared MIME type; informational only
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<HashMap<String, Value>>,
    },

    /// Nested container of parts
    Data {
        data: Vec<Part>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<HashMap<String, Value>>,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Create a file part with a URL reference
    pub fn file(url: impl Into<String>) -> Self {
        Self::File {
            url: url.into(),
            mime_type: None,
            name: None,
            metadata: None,
        }
    }

    /// Create a file part with a URL and MIME type
    pub fn file_with_type(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::File {
            url: url.into(),
            mime_type: Some(mime_type.into()),
            name: None,
            metadata: None,
        }
    }

    /// Create a data part nesting other parts
    pub fn data(parts: Vec<Part>) -> Self {
        Self::Data {
            data: parts,
            metadata: None,
        }
    }

    /// The wire discriminator of this part
    pub fn kind(&self) -> &'static str {
        match self {
            Part::Text { .. } => "text",
            Part::File { .. } => "file",
            Part::Data { .. } => "data",
        }
    }
}
