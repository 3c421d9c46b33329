//! Clause findings returned by the review service

use serde::{Deserialize, Serialize};

/// One analyzed unit of contract text.
///
/// The canonical wire schema uses `clause_index`/`clause_text`. Older
/// producers emitted `index`/`text`; those are accepted as aliases on input
/// and never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Position within the source document; unique per job, defines display order
    #[serde(alias = "index")]
    pub clause_index: u32,
    /// Original clause text
    #[serde(alias = "text")]
    pub clause_text: String,
    /// Detected compliance problem; absent means no issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    /// Remediation recommendation, independent of `issue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Clause {
    /// Whether this clause carries an issue annotation
    pub fn has_issue(&self) -> bool {
        self.issue.is_some()
    }
}

/// Count the clauses carrying an issue annotation.
pub fn issue_count(clauses: &[Clause]) -> usize {
    clauses.iter().filter(|c| c.has_issue()).count()
}
