//! Building a fresh report by driving the answer service across the
//! question set.

use tracing::{debug, warn};

use crate::questions::QuestionKey;
use crate::service::AnswerService;
use crate::table::{ReportRow, ReportTable};

/// Literal value recorded for a cell whose question failed.
pub const ERROR_SENTINEL: &str = "Error";

/// Build one row per society, in input order.
///
/// For each society, every question in [`QuestionKey::ALL`] order is
/// instantiated and asked. A failed question records [`ERROR_SENTINEL`] in
/// that cell and moves on; a single bad cell never aborts the row or the
/// batch.
pub async fn build_report(service: &dyn AnswerService, societies: &[String]) -> ReportTable {
    let mut table = ReportTable::new();

    for society in societies {
        debug!(society = %society, "building report row");
        let mut row = ReportRow::new(society.clone());

        for key in QuestionKey::ALL {
            let question = key.instantiate(society);
            match service.ask(&question).await {
                Ok(answer) => row.set_answer(key, answer.trim()),
                Err(e) => {
                    warn!(
                        society = %society,
                        question = key.alias(),
                        error = %e,
                        "answer service failed, recording sentinel"
                    );
                    row.set_answer(key, ERROR_SENTINEL);
                }
            }
        }

        table.push(row);
    }

    table
}
