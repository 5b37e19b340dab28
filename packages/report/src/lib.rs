//! Society Report Library
//!
//! Generates a tabular report about pharmaceutical professional societies by
//! asking a fixed question set to an LLM-backed answer service, reconciles
//! the fresh rows into the persisted table, and writes it back to a remote
//! blob store under optimistic concurrency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use report::{build_report, reconcile, GithubStore, MergePolicy, ReportStore};
//! use report::ai::OpenAiAnswerer;
//!
//! let service = OpenAiAnswerer::from_env()?;
//! let store = GithubStore::new(token, "owner/repo", "Pharma_Society_Report.csv")?;
//!
//! let fresh = build_report(&service, &societies).await;
//! let (mut table, token) = store.fetch().await?;
//! reconcile(&mut table, fresh, MergePolicy::Average);
//! store.write(&table, token).await?;
//! ```
//!
//! # Modules
//!
//! - [`questions`] - The fixed question set and its stable column keys
//! - [`table`] - Report rows, the consolidated table, CSV codec
//! - [`builder`] - Driving the answer service across the question set
//! - [`reconcile`] - Merging fresh rows into the persisted table
//! - [`store`] - Blob-store clients (GitHub, in-memory)
//! - [`query`] - Ad hoc questions grounded in the report
//! - [`testing`] - Mock implementations for tests

pub mod builder;
pub mod error;
pub mod query;
pub mod questions;
pub mod reconcile;
pub mod service;
pub mod store;
pub mod table;
pub mod testing;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use builder::{build_report, ERROR_SENTINEL};
pub use error::{AskError, StoreError};
pub use query::{answer_about_report, format_report_context};
pub use questions::{QuestionKey, PLACEHOLDER};
pub use reconcile::{reconcile, MergePolicy, ReconcileWarning};
pub use service::AnswerService;
pub use store::{GithubStore, MemoryStore, ReportStore, VersionToken};
pub use table::{ReportRow, ReportTable, SOCIETY_NAME_COLUMN};
