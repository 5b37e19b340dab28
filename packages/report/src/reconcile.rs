//! Merging freshly built rows into the persisted table.
//!
//! The merge is gated per row on the membership-count cell: an incoming row
//! whose count does not parse as an integer is dropped entirely, never
//! partially merged. Matched rows only have their membership-count cell
//! touched; unmatched rows are appended whole.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::questions::QuestionKey;
use crate::table::ReportTable;

/// How an incoming membership count combines with an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace the existing count with the incoming one.
    Overwrite,

    /// Replace with the integer average (floor of the sum halved) of the
    /// existing and incoming counts; falls back to overwrite when the
    /// existing cell does not parse.
    #[default]
    Average,
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(MergePolicy::Overwrite),
            "average" => Ok(MergePolicy::Average),
            other => Err(format!(
                "unknown merge policy '{}' (expected 'overwrite' or 'average')",
                other
            )),
        }
    }
}

/// A row the reconciler refused to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileWarning {
    /// Society whose row was skipped
    pub society: String,

    /// The membership-count cell that failed to parse
    pub value: String,
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipped row for '{}': membership count '{}' is not an integer",
            self.society, self.value
        )
    }
}

/// Merge `incoming` into `existing`, row by row, in incoming order.
///
/// For each incoming row:
/// 1. Parse the membership count; unparseable rows are skipped whole and
///    reported as warnings.
/// 2. Exact society-name match in `existing`: update only the
///    membership-count cell per `policy`. No match: append the full row.
///
/// Society names stay unique in the output whenever they were unique in the
/// input, since appends only happen when no match exists.
pub fn reconcile(
    existing: &mut ReportTable,
    incoming: ReportTable,
    policy: MergePolicy,
) -> Vec<ReconcileWarning> {
    let mut warnings = Vec::new();

    for row in incoming.into_rows() {
        let Some(new_count) = row.membership_count() else {
            let warning = ReconcileWarning {
                society: row.society.clone(),
                value: row
                    .answer(QuestionKey::MembershipCount)
                    .unwrap_or("")
                    .to_string(),
            };
            warn!(society = %warning.society, value = %warning.value,
                "invalid membership count, skipping update");
            warnings.push(warning);
            continue;
        };

        if let Some(current) = existing.find_mut(&row.society) {
            let merged = match (policy, current.membership_count()) {
                // Floor division, so negative sums round down rather than
                // toward zero.
                (MergePolicy::Average, Some(old_count)) => {
                    (old_count + new_count).div_euclid(2)
                }
                _ => new_count,
            };
            current.set_answer(QuestionKey::MembershipCount, merged.to_string());
        } else {
            existing.push(row);
        }
    }

    warnings
}
