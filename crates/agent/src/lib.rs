//! # RMD Agent
//!
//! Assessment orchestration for the RMD screening system. Two strategies
//! sit behind the [`Assessor`] trait:
//!
//! - [`RuleBasedAssessor`] — composes the pure analysis functions from
//!   `rmd-core` directly; never fails.
//! - [`LlmAssessor`] — runs the analysis tools, builds a clinical prompt,
//!   delegates to an OpenAI-compatible chat endpoint through [`LlmClient`],
//!   and parses the structured JSON reply.
//!
//! [`FallbackAssessor`] wraps any primary strategy and guarantees the
//! caller always receives a valid `RiskAssessment`: every failure of the
//! primary short-circuits to the rule-based output with the failure reason
//! embedded in the reasoning text and an explicit red flag.

pub mod assessor;
pub mod client;
pub mod config;
pub mod extract;
pub mod prompts;

pub use assessor::{Assessor, FallbackAssessor, LlmAssessor, RuleBasedAssessor};
pub use client::{HttpLlmClient, LlmClient};
pub use config::AgentConfig;

/// Failures of the LLM-backed strategy.
///
/// None of these reach the caller of [`FallbackAssessor::assess`]; they are
/// resolved internally by falling back to the rule-based strategy.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("no API key configured")]
    NotConfigured,
    #[error("cannot connect to LLM endpoint at {0}")]
    Connection(String),
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
    #[error("LLM endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("LLM transport error: {0}")]
    Transport(String),
    #[error("failed to parse LLM response: {0}")]
    ResponseParsing(String),
    #[error("LLM response contained no JSON object")]
    MalformedResponse,
    #[error("LLM assessment failed validation: {0}")]
    InvalidAssessment(String),
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;
