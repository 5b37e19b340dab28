//! OpenAI implementation of the [`AnswerService`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use report::ai::OpenAiAnswerer;
//!
//! let service = OpenAiAnswerer::from_env()?.with_model("gpt-4o-mini");
//! let table = build_report(&service, &societies).await;
//! ```

use async_trait::async_trait;

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

use crate::error::AskError;
use crate::service::AnswerService;

/// Answer service backed by OpenAI chat completions.
#[derive(Clone)]
pub struct OpenAiAnswerer {
    client: OpenAIClient,
    model: String,
}

impl OpenAiAnswerer {
    /// Create a new answerer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AskError> {
        let client =
            OpenAIClient::new(api_key).map_err(|e| AskError::Service(e.to_string()))?;
        Ok(Self {
            client,
            model: "gpt-4o-mini".to_string(),
        })
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, AskError> {
        let client = OpenAIClient::from_env().map_err(|e| AskError::Service(e.to_string()))?;
        Ok(Self {
            client,
            model: "gpt-4o-mini".to_string(),
        })
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl AnswerService for OpenAiAnswerer {
    async fn ask(&self, question: &str) -> Result<String, AskError> {
        let request = ChatRequest::new(&self.model).message(Message::user(question));

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| match e {
                OpenAIError::Network(msg) => AskError::Network(msg),
                other => AskError::Service(other.to_string()),
            })?;

        let answer = response.content.trim().to_string();
        if answer.is_empty() {
            return Err(AskError::Empty);
        }
        Ok(answer)
    }
}
