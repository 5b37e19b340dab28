//! Answer service trait.
//!
//! Abstracts the LLM-backed text-completion endpoint the report is built
//! from: one fully-instantiated question in, one trimmed answer out.

use async_trait::async_trait;

use crate::error::AskError;

/// A service answering one natural-language question at a time.
///
/// Implementations wrap a specific provider (OpenAI in production, mocks in
/// tests). No retries here; the caller decides what a failure costs.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask a single question (placeholder already substituted).
    ///
    /// Returns the trimmed text response.
    async fn ask(&self, question: &str) -> Result<String, AskError>;
}
