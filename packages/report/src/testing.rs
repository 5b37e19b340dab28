//! Testing utilities including mock implementations.
//!
//! Useful for testing code that drives the answer service without making
//! real LLM calls.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::AskError;
use crate::service::AnswerService;

/// A mock answer service with scripted responses.
///
/// Questions can be given exact answers, marked as failing, or fall through
/// to a default answer. Every question asked is recorded for assertions.
#[derive(Default)]
pub struct MockAnswerService {
    answers: RwLock<HashMap<String, String>>,
    failures: RwLock<HashSet<String>>,
    default_answer: Option<String>,
    calls: RwLock<Vec<String>>,
}

impl MockAnswerService {
    /// Create a mock with no scripted behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an exact answer for an exact question.
    pub fn with_answer(self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(question.into(), answer.into());
        self
    }

    /// Make an exact question fail with a service error.
    pub fn with_failure(self, question: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(question.into());
        self
    }

    /// Answer for any question without a script.
    pub fn with_default(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = Some(answer.into());
        self
    }

    /// All questions asked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// How many questions were asked.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, question: &str) -> Result<String, AskError> {
        self.calls.write().unwrap().push(question.to_string());

        if self.failures.read().unwrap().contains(question) {
            return Err(AskError::Service("scripted failure".to_string()));
        }
        if let Some(answer) = self.answers.read().unwrap().get(question) {
            return Ok(answer.clone());
        }
        match &self.default_answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(AskError::Service(format!(
                "no scripted answer for: {}",
                question
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answer_wins_over_default() {
        let service = MockAnswerService::new()
            .with_default("no")
            .with_answer("q1", "yes");

        assert_eq!(service.ask("q1").await.unwrap(), "yes");
        assert_eq!(service.ask("q2").await.unwrap(), "no");
        assert_eq!(service.calls(), vec!["q1".to_string(), "q2".to_string()]);
    }

    #[tokio::test]
    async fn test_unscripted_question_fails_without_default() {
        let service = MockAnswerService::new();
        assert!(service.ask("q1").await.is_err());
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let service = MockAnswerService::new().with_default("yes").with_failure("bad");
        assert!(matches!(service.ask("bad").await, Err(AskError::Service(_))));
        assert_eq!(service.ask("good").await.unwrap(), "yes");
    }
}
