//! Ad hoc questions about the consolidated report.
//!
//! The conversational interface does not query the table directly: it
//! serializes the whole table into a text context block, prepends it to the
//! user's question, and delegates to the answer service.

use crate::error::AskError;
use crate::questions::QuestionKey;
use crate::service::AnswerService;
use crate::table::ReportTable;

const NO_DATA_CONTEXT: &str = "No report data is currently available.";

const PREAMBLE: &str = "You are an AI assistant fine-tuned to answer questions based on a \
pharmaceutical society consolidated report. Use the following report data to answer user \
queries accurately if the information exists in the report. If the query cannot be answered \
using the report, respond using your general knowledge:";

/// Serialize the table into the context block consumed by the answer
/// service.
///
/// Format, per row: `Society Name: …` followed by one indented
/// `<template>: <value>` line per column, rows separated by blank lines.
pub fn format_report_context(table: &ReportTable) -> String {
    if table.is_empty() {
        return NO_DATA_CONTEXT.to_string();
    }

    let mut context = String::from("Here is the consolidated report data:\n");
    for row in table.rows() {
        context.push_str(&format!("Society Name: {}\n", row.society));
        for key in QuestionKey::ALL {
            context.push_str(&format!(
                "  {}: {}\n",
                key.template(),
                row.answer(key).unwrap_or("")
            ));
        }
        context.push('\n');
    }
    context.trim_end().to_string()
}

/// Answer a free-form question grounded in the report.
pub async fn answer_about_report(
    service: &dyn AnswerService,
    table: &ReportTable,
    question: &str,
) -> Result<String, AskError> {
    let prompt = format!(
        "{}\n\n{}\n\nUser's question: {}\n\nRespond concisely using the data provided.",
        PREAMBLE,
        format_report_context(table),
        question
    );
    service.ask(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ReportRow;
    use crate::testing::MockAnswerService;

    #[test]
    fn test_empty_table_context() {
        assert_eq!(format_report_context(&ReportTable::new()), NO_DATA_CONTEXT);
    }

    #[test]
    fn test_context_lists_each_row_with_columns() {
        let mut table = ReportTable::new();
        table.push(
            ReportRow::new("FLASCO").with_answer(QuestionKey::MembershipCount, "1200"),
        );
        table.push(ReportRow::new("GASCO").with_answer(QuestionKey::Region, "Southeast"));

        let context = format_report_context(&table);

        assert!(context.starts_with("Here is the consolidated report data:"));
        assert!(context.contains("Society Name: FLASCO"));
        assert!(context.contains("Society Name: GASCO"));
        // Columns appear under their literal templates.
        assert!(context.contains(&format!(
            "  {}: 1200",
            QuestionKey::MembershipCount.template()
        )));
        assert!(context.contains(&format!("  {}: Southeast", QuestionKey::Region.template())));
    }

    #[tokio::test]
    async fn test_question_is_prefixed_with_context() {
        let service = MockAnswerService::new().with_default("FLASCO");
        let mut table = ReportTable::new();
        table.push(ReportRow::new("FLASCO").with_answer(QuestionKey::MembershipCount, "1200"));

        let answer = answer_about_report(&service, &table, "Which society is largest?")
            .await
            .unwrap();
        assert_eq!(answer, "FLASCO");

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("Society Name: FLASCO"));
        assert!(calls[0].contains("User's question: Which society is largest?"));
    }
}
