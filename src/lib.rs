//! # Tower A2A Audio
//!
//! An Agent2Agent (A2A) protocol agent that transcribes and summarizes audio,
//! built on Tower's Service and Layer abstractions.
//!
//! A `message/send` call carries a multi-part message. The agent searches the
//! parts for a content source (a file reference, or a URL inside text or
//! nested data), hands it to a [`backend::Summarizer`], and records the turn as
//! a [`protocol::Task`] with its full history. `task/get` and `task/list` read
//! those tasks back.
//!
//! ## Features
//!
//! - **Tower native**: the JSON-RPC dispatcher is a `tower::Service`, envelope
//!   checks are a `tower::Layer`
//! - **Pluggable processing**: any [`backend::Summarizer`] can be served; the
//!   shipped one chains Google Speech-to-Text and Gemini
//! - **Per-task serialization**: concurrent turns on one task never interleave
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use tower_a2a_audio::prelude::*;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Summarizer for Echo {
//!     async fn summarize(&self, locator: &str) -> Result<String, ProcessingError> {
//!         Ok(format!("received {locator}"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new().with_bind("127.0.0.1", 8080);
//!     tower_a2a_audio::server::serve(config, Arc::new(Echo)).await
//! }
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod extract;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        backend::{ProcessingError, Summarizer},
        codec::{JsonRpcRequest, JsonRpcResponse},
        config::ServerConfig,
        extract::extract_source,
        protocol::error::A2AError,
        protocol::{A2AOperation, AgentCard, Message, Part, Role, Task, TaskState, TaskStatus},
        service::{A2AServerService, TaskManager},
        store::TaskStore,
    };
}
