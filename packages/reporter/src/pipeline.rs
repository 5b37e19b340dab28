//! The build → fetch → reconcile → write → email pipeline.
//!
//! One pipeline run is one logical operation: the version token obtained by
//! the fetch guards the single write that follows it and is never reused.
//! There is no shared report state outside this flow; the scheduler and any
//! manual trigger both go through [`Pipeline::run`].

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use report::{build_report, reconcile, AnswerService, ReportStore};

use crate::config::Config;
use crate::mailer;

/// Owns the collaborators for a pipeline run and serializes runs.
pub struct Pipeline {
    service: Arc<dyn AnswerService>,
    store: Arc<dyn ReportStore>,
    config: Config,
    running: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        service: Arc<dyn AnswerService>,
        store: Arc<dyn ReportStore>,
        config: Config,
    ) -> Self {
        Self {
            service,
            store,
            config,
            running: Mutex::new(()),
        }
    }

    /// Scheduler entry point: run once, unless a run is already in flight.
    ///
    /// A firing that overlaps a running pipeline is skipped, not queued; the
    /// next firing starts from whatever the overlapping run persisted.
    pub async fn run_guarded(&self) {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("previous report run still in progress, skipping this firing");
            return;
        };

        if let Err(e) = self.run().await {
            error!(error = %e, "report pipeline run failed");
        }
    }

    /// Run the pipeline once.
    ///
    /// A store failure (including a stale-token conflict) aborts the run
    /// before anything is written; previously persisted data is untouched.
    pub async fn run(&self) -> Result<()> {
        info!(societies = self.config.societies.len(), "building fresh report");
        let fresh = build_report(self.service.as_ref(), &self.config.societies).await;

        let (mut table, token) = self
            .store
            .fetch()
            .await
            .context("failed to fetch persisted report")?;

        let warnings = reconcile(&mut table, fresh, self.config.merge_policy);
        if !warnings.is_empty() {
            warn!(skipped = warnings.len(), "some rows were not merged");
        }

        self.store
            .write(&table, token)
            .await
            .context("failed to write merged report")?;
        info!(rows = table.len(), "merged report persisted");

        if let Some(mail) = &self.config.mail {
            match mailer::send_report_email(mail, &table.to_html()).await {
                Ok(()) => info!(to = %mail.to, "report digest emailed"),
                // The report is already persisted; a mail failure costs only
                // this week's digest.
                Err(e) => error!(error = %e, "failed to email report digest"),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::questions::QuestionKey;
    use report::testing::MockAnswerService;
    use report::{MemoryStore, MergePolicy, ReportRow, ReportTable};

    fn test_config() -> Config {
        Config {
            openai_api_key: "sk-test".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            github_token: "ghp-test".to_string(),
            github_repo: "owner/repo".to_string(),
            report_path: "report.csv".to_string(),
            schedule: "0 0 10 * * MON".to_string(),
            merge_policy: MergePolicy::Average,
            societies: vec!["A".to_string(), "B".to_string()],
            mail: None,
        }
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let mut table = ReportTable::new();
        table.push(
            ReportRow::new("A")
                .with_answer(QuestionKey::MembershipCount, "100")
                .with_answer(QuestionKey::Region, "East"),
        );
        Arc::new(MemoryStore::with_table(table))
    }

    #[tokio::test]
    async fn test_run_merges_and_persists() {
        let service = Arc::new(MockAnswerService::new().with_default("200"));
        let store = seeded_store();
        let pipeline = Pipeline::new(service, store.clone(), test_config());

        pipeline.run().await.unwrap();

        let persisted = store.table();
        assert_eq!(persisted.len(), 2);
        // Existing A averaged: (100 + 200) / 2.
        assert_eq!(persisted.find("A").unwrap().membership_count(), Some(150));
        // Other cells untouched.
        assert_eq!(
            persisted.find("A").unwrap().answer(QuestionKey::Region),
            Some("East")
        );
        // New society appended whole.
        assert_eq!(persisted.find("B").unwrap().membership_count(), Some(200));
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_failed_counts_leave_table_untouched() {
        // Every answer is non-numeric, so every incoming row is skipped.
        let service = Arc::new(MockAnswerService::new().with_default("approx"));
        let store = seeded_store();
        let before = store.table();
        let pipeline = Pipeline::new(service, store.clone(), test_config());

        pipeline.run().await.unwrap();

        assert_eq!(store.table(), before);
    }

    #[tokio::test]
    async fn test_run_guarded_completes() {
        let service = Arc::new(MockAnswerService::new().with_default("50"));
        let store = Arc::new(MemoryStore::new());
        let pipeline = Pipeline::new(service, store.clone(), test_config());

        pipeline.run_guarded().await;

        assert_eq!(store.table().len(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_firing_is_skipped() {
        let service = Arc::new(MockAnswerService::new().with_default("50"));
        let store = Arc::new(MemoryStore::new());
        let pipeline = Pipeline::new(service.clone(), store.clone(), test_config());

        // Simulate a run still in flight.
        let in_flight = pipeline.running.lock().await;
        pipeline.run_guarded().await;

        // The overlapping firing asked nothing and wrote nothing.
        assert_eq!(service.call_count(), 0);
        assert_eq!(store.version(), 0);

        // Once the in-flight run finishes, the next firing proceeds.
        drop(in_flight);
        pipeline.run_guarded().await;
        assert_eq!(store.version(), 1);
    }
}
