//! Report rows, the consolidated table, and its persisted encoding.
//!
//! The persisted file is a single-sheet CSV: first column `Society Name`,
//! remaining columns the literal question templates (never the display
//! aliases — aliasing is presentation-only and must be reversed before any
//! write-back).

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::questions::QuestionKey;

/// Header of the first column in the persisted file.
pub const SOCIETY_NAME_COLUMN: &str = "Society Name";

/// One row of answers for a single society.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Display name of the society; the only identity it has
    pub society: String,

    answers: BTreeMap<QuestionKey, String>,
}

impl ReportRow {
    /// Create an empty row for a society.
    pub fn new(society: impl Into<String>) -> Self {
        Self {
            society: society.into(),
            answers: BTreeMap::new(),
        }
    }

    /// Get the answer for a question, if recorded.
    pub fn answer(&self, key: QuestionKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    /// Record an answer for a question.
    pub fn set_answer(&mut self, key: QuestionKey, value: impl Into<String>) {
        self.answers.insert(key, value.into());
    }

    /// Builder-style variant of [`set_answer`](Self::set_answer).
    pub fn with_answer(mut self, key: QuestionKey, value: impl Into<String>) -> Self {
        self.set_answer(key, value);
        self
    }

    /// Parse the membership-count cell as an integer.
    ///
    /// The membership count is the only column with a numeric domain; the
    /// reconciler keys its row-skipping gate on this parse.
    pub fn membership_count(&self) -> Option<i64> {
        self.answer(QuestionKey::MembershipCount)?.trim().parse().ok()
    }
}

/// The consolidated report: one ordered row per society.
///
/// Society-name uniqueness is not guaranteed by construction; the reconciler
/// enforces it on every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter()
    }

    /// Consume the table, yielding its rows in order.
    pub fn into_rows(self) -> impl Iterator<Item = ReportRow> {
        self.rows.into_iter()
    }

    /// Find a row by exact society name.
    pub fn find(&self, society: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.society == society)
    }

    /// Find a row by exact society name, mutably.
    pub fn find_mut(&mut self, society: &str) -> Option<&mut ReportRow> {
        self.rows.iter_mut().find(|r| r.society == society)
    }

    /// Append a row at the end of the table.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Encode the table as single-sheet CSV with template headers.
    pub fn to_csv(&self) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);

            let mut header = Vec::with_capacity(1 + QuestionKey::ALL.len());
            header.push(SOCIETY_NAME_COLUMN);
            header.extend(QuestionKey::ALL.iter().map(|k| k.template()));
            writer
                .write_record(&header)
                .map_err(|e| StoreError::Encode(e.to_string()))?;

            for row in &self.rows {
                let mut record = Vec::with_capacity(header.len());
                record.push(row.society.as_str());
                for key in QuestionKey::ALL {
                    record.push(row.answer(key).unwrap_or(""));
                }
                writer
                    .write_record(&record)
                    .map_err(|e| StoreError::Encode(e.to_string()))?;
            }

            writer
                .flush()
                .map_err(|e| StoreError::Encode(e.to_string()))?;
        }
        Ok(buf)
    }

    /// Decode a table from persisted CSV bytes.
    ///
    /// Columns are matched by literal template text; unknown columns are
    /// ignored and missing cells come back empty. An all-whitespace file is
    /// an empty table.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
        let headers = reader
            .headers()
            .map_err(|e| StoreError::Decode(e.to_string()))?
            .clone();

        let mut society_idx = None;
        let mut columns: Vec<Option<QuestionKey>> = Vec::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if header == SOCIETY_NAME_COLUMN {
                society_idx = Some(i);
                columns.push(None);
            } else {
                columns.push(QuestionKey::from_template(header));
            }
        }
        let society_idx = society_idx.ok_or_else(|| {
            StoreError::Decode(format!("missing '{}' column", SOCIETY_NAME_COLUMN))
        })?;

        let mut table = Self::new();
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::Decode(e.to_string()))?;
            let society = record.get(society_idx).unwrap_or("").trim();
            if society.is_empty() {
                continue;
            }

            let mut row = ReportRow::new(society);
            for (i, key) in columns.iter().enumerate() {
                if let Some(key) = key {
                    row.set_answer(*key, record.get(i).unwrap_or(""));
                }
            }
            table.push(row);
        }
        Ok(table)
    }

    /// Render the table as an HTML fragment for the email digest.
    ///
    /// Uses the short aliases as headers; the digest is presentation, not
    /// persistence.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr>");
        html.push_str(&format!("<th>{}</th>", SOCIETY_NAME_COLUMN));
        for key in QuestionKey::ALL {
            html.push_str(&format!("<th>{}</th>", escape_html(key.alias())));
        }
        html.push_str("</tr>\n  </thead>\n  <tbody>\n");

        for row in &self.rows {
            html.push_str("    <tr>");
            html.push_str(&format!("<td>{}</td>", escape_html(&row.society)));
            for key in QuestionKey::ALL {
                html.push_str(&format!(
                    "<td>{}</td>",
                    escape_html(row.answer(key).unwrap_or(""))
                ));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("  </tbody>\n</table>");
        html
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(society: &str, count: &str, region: &str) -> ReportRow {
        ReportRow::new(society)
            .with_answer(QuestionKey::MembershipCount, count)
            .with_answer(QuestionKey::Region, region)
    }

    #[test]
    fn test_membership_count_parsing() {
        assert_eq!(sample_row("A", "1200", "East").membership_count(), Some(1200));
        assert_eq!(sample_row("A", " 1200 ", "East").membership_count(), Some(1200));
        assert_eq!(sample_row("A", "approx 1200", "East").membership_count(), None);
        assert_eq!(ReportRow::new("A").membership_count(), None);
    }

    #[test]
    fn test_csv_round_trip() {
        let mut table = ReportTable::new();
        table.push(sample_row("FLASCO (Florida Society of Clinical Oncology)", "1500", "Southeast"));
        table.push(
            sample_row("GASCO (Georgia Society of Clinical Oncology)", "900", "Southeast")
                .with_answer(QuestionKey::CommunitySites, "yes, has community sites"),
        );

        let bytes = table.to_csv().unwrap();
        let decoded = ReportTable::from_csv(&bytes).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_csv_headers_use_templates_not_aliases() {
        let mut table = ReportTable::new();
        table.push(sample_row("A", "1", "East"));
        let text = String::from_utf8(table.to_csv().unwrap()).unwrap();
        let header = text.lines().next().unwrap();

        assert!(header.contains("What is the membership count for society_name?"));
        assert!(!header.contains("Membership Count"));
    }

    #[test]
    fn test_from_csv_empty_input_is_empty_table() {
        assert!(ReportTable::from_csv(b"").unwrap().is_empty());
        assert!(ReportTable::from_csv(b"  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_from_csv_missing_society_column() {
        let err = ReportTable::from_csv(b"Foo,Bar\n1,2\n").unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_from_csv_ignores_unknown_columns() {
        let csv = format!(
            "{},{},Unrelated\nFLASCO,1200,junk\n",
            SOCIETY_NAME_COLUMN,
            QuestionKey::MembershipCount.template()
        );
        let table = ReportTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.find("FLASCO").unwrap().membership_count(), Some(1200));
    }

    #[test]
    fn test_to_html_escapes_values() {
        let mut table = ReportTable::new();
        table.push(sample_row("A <&> B", "10", "East"));
        let html = table.to_html();

        assert!(html.contains("A &lt;&amp;&gt; B"));
        assert!(html.contains("<th>Membership Count</th>"));
    }
}
