//! Job identity and result snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clause::{self, Clause};

/// Lifecycle state of a submitted review job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Analysis has not produced a result yet
    Pending,
    /// Terminal: the findings are final for this job id
    Ready,
    /// Terminal: the backend reported a definitive failure
    Error,
}

/// Receipt returned by a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Backend-assigned opaque job id; never reused
    pub id: String,
    /// Local submission timestamp
    pub submitted_at: DateTime<Utc>,
}

/// Point-in-time view of a job as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// The job this snapshot belongs to
    pub id: String,
    /// Reported lifecycle state
    pub status: JobStatus,
    /// Clause findings; populated only when `status` is `Ready`
    pub output: Vec<Clause>,
    /// Backend-supplied detail, e.g. "Result not ready yet."
    pub message: Option<String>,
    /// When this snapshot was observed
    pub fetched_at: DateTime<Utc>,
}

impl JobSnapshot {
    /// Whether the findings are final
    pub fn is_ready(&self) -> bool {
        self.status == JobStatus::Ready
    }

    /// Whether the job will not change state anymore
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Ready | JobStatus::Error)
    }

    /// Number of clauses flagged with an issue
    pub fn issue_count(&self) -> usize {
        clause::issue_count(&self.output)
    }
}

/// Wire shape of the result document served by both the fetch endpoint and
/// the push channel. The ready status string is `"ok"`; `"error"` marks a
/// definitive failure; anything else means the result is not there yet.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultDocument {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output: Vec<Clause>,
}

impl ResultDocument {
    fn job_status(&self) -> JobStatus {
        match self.status.as_str() {
            "ok" => JobStatus::Ready,
            "error" => JobStatus::Error,
            _ => JobStatus::Pending,
        }
    }

    /// Convert into a snapshot for `id`. Output is dropped unless the job is
    /// ready, so a pending answer never leaks partial findings.
    pub(crate) fn into_snapshot(self, id: &str) -> JobSnapshot {
        let status = self.job_status();
        let output = if status == JobStatus::Ready {
            self.output
        } else {
            Vec::new()
        };
        JobSnapshot {
            id: id.to_string(),
            status,
            output,
            message: self.message,
            fetched_at: Utc::now(),
        }
    }

    /// Convert into a snapshot that is pending regardless of the body's
    /// status string. Used for HTTP 202 answers, where the status code is
    /// authoritative.
    pub(crate) fn into_pending_snapshot(self, id: &str) -> JobSnapshot {
        JobSnapshot {
            id: id.to_string(),
            status: JobStatus::Pending,
            output: Vec::new(),
            message: self.message,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ResultDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_status_is_ready_with_output() {
        let doc = parse(
            r#"{
                "status": "ok",
                "problematic_count": 1,
                "output": [
                    { "clause_index": 1, "clause_text": "Supplier may terminate at will.", "issue": "One-sided termination." }
                ]
            }"#,
        );
        let snapshot = doc.into_snapshot("job-123");
        assert!(snapshot.is_ready());
        assert_eq!(snapshot.output.len(), 1);
        assert_eq!(snapshot.issue_count(), 1);
    }

    #[test]
    fn processing_status_is_pending_without_output() {
        let doc = parse(r#"{ "status": "processing", "message": "Result not ready yet." }"#);
        let snapshot = doc.into_snapshot("job-123");
        assert_eq!(snapshot.status, JobStatus::Pending);
        assert!(snapshot.output.is_empty());
        assert_eq!(snapshot.message.as_deref(), Some("Result not ready yet."));
    }

    #[test]
    fn unknown_status_vocabulary_is_pending() {
        let doc = parse(r#"{ "status": "queued" }"#);
        assert_eq!(doc.into_snapshot("job-1").status, JobStatus::Pending);
    }

    #[test]
    fn error_status_is_terminal() {
        let doc = parse(r#"{ "status": "error", "message": "Result format error." }"#);
        let snapshot = doc.into_snapshot("job-1");
        assert_eq!(snapshot.status, JobStatus::Error);
        assert!(snapshot.is_terminal());
        assert!(!snapshot.is_ready());
    }

    #[test]
    fn pending_answer_drops_any_output() {
        let doc = parse(
            r#"{
                "status": "processing",
                "output": [ { "clause_index": 0, "clause_text": "partial" } ]
            }"#,
        );
        assert!(doc.into_snapshot("job-1").output.is_empty());
    }

    #[test]
    fn accepted_answer_is_pending_even_when_body_says_ok() {
        let doc = parse(r#"{ "status": "ok", "output": [] }"#);
        assert_eq!(doc.into_pending_snapshot("job-1").status, JobStatus::Pending);
    }
}
