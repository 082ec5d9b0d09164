//! Recon chatbot agent — library crate.
//!
//! Turns a natural-language question about an Ozone cluster into a Recon
//! REST call chosen by Gemini, then has Gemini summarize the result.
//! Re-exports all modules so the CLI binary, the chat API server and
//! `rc-e2e-tests` share the same types.

pub mod agent;
pub mod config;
pub mod console;
pub mod docs;
pub mod error;
pub mod llm;
pub mod mock;
pub mod recon;

pub use agent::ChatAgent;
pub use config::ChatbotConfig;
pub use docs::ApiDocs;
pub use llm::{GeminiClient, LanguageModel};
pub use recon::{MonitoringApi, ReconClient};
