//! Indexing job domain types
//!
//! An [`IndexStatus`] is a point-in-time snapshot of a shop's latest catalog
//! indexing job, as reported by the backend. Snapshots are immutable and are
//! replaced wholesale on every poll.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot of the latest indexing job for a shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Current job status
    pub status: Status,

    /// Identifier of the latest job, absent when no job exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,

    /// Products processed so far (meaningful while running)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub processed: u64,

    /// Products to process in total (meaningful while running)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total: u64,

    /// Products indexed as of the last completed run
    #[serde(default, deserialize_with = "null_as_zero")]
    pub product_count: u64,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Backend-reported failure, only present when `status` is `error`
    #[serde(default)]
    pub error: Option<String>,

    /// Informational text, e.g. sent alongside `no_jobs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IndexStatus {
    /// Snapshot for a shop that has never been indexed
    pub fn no_jobs() -> Self {
        Self {
            status: Status::NoJobs,
            job_id: None,
            processed: 0,
            total: 0,
            product_count: 0,
            started_at: None,
            finished_at: None,
            error: None,
            message: None,
        }
    }

    /// Progress of a running job in percent, rounded half up.
    ///
    /// Returns 0 when `total` is 0. Counters are reported as received, so a
    /// backend sending `processed > total` yields a value above 100.
    pub fn progress_percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let scaled = u128::from(self.processed) * 100;
        let total = u128::from(self.total);
        ((scaled + total / 2) / total) as u64
    }
}

/// Indexing job status
///
/// Serialized as the backend's snake_case strings. Strings the client does
/// not recognize are kept verbatim in [`Status::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    NoJobs,
    Queued,
    Running,
    Done,
    Error,
    Unknown(String),
}

impl Status {
    /// `done` and `error`: the backend will not advance the job further
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Done | Status::Error)
    }

    /// `queued` and `running`: the backend is still working on the job
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Status::Queued | Status::Running)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::NoJobs => "no_jobs",
            Status::Queued => "queued",
            Status::Running => "running",
            Status::Done => "done",
            Status::Error => "error",
            Status::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "no_jobs" => Status::NoJobs,
            "queued" => Status::Queued,
            "running" => Status::Running,
            "done" => Status::Done,
            "error" => Status::Error,
            _ => Status::Unknown(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque job identifier
///
/// The backend emits job ids either as JSON strings or as integers; both
/// decode to the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => JobId(n.to_string()),
            RawId::Text(s) => JobId(s),
        })
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps as well as naive ISO-8601 ones, which are
/// taken to be UTC.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decodes_running_snapshot() {
        let status: IndexStatus = serde_json::from_str(
            r#"{
                "job_id": 7,
                "status": "running",
                "total": 50,
                "processed": 15,
                "product_count": 25,
                "started_at": "2025-01-01T10:00:00Z",
                "finished_at": null,
                "error": null
            }"#,
        )
        .unwrap();

        assert_eq!(status.status, Status::Running);
        assert_eq!(status.job_id, Some(JobId::from("7")));
        assert_eq!(status.processed, 15);
        assert_eq!(status.total, 50);
        assert_eq!(status.product_count, 25);
        assert_eq!(
            status.started_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap())
        );
        assert!(status.finished_at.is_none());
        assert!(status.error.is_none());
    }

    #[test]
    fn test_decodes_no_jobs_with_missing_counters() {
        let status: IndexStatus =
            serde_json::from_str(r#"{"status": "no_jobs", "message": "No indexing jobs found"}"#)
                .unwrap();

        assert_eq!(status.status, Status::NoJobs);
        assert_eq!(status.total, 0);
        assert_eq!(status.product_count, 0);
        assert_eq!(status.message.as_deref(), Some("No indexing jobs found"));
        assert_eq!(status.progress_percent(), 0);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let status: IndexStatus = serde_json::from_str(
            r#"{"status": "done", "started_at": "2025-03-04T05:06:07.123456",
                "finished_at": "2025-03-04T05:16:07"}"#,
        )
        .unwrap();

        let started = status.started_at.unwrap();
        let finished = status.finished_at.unwrap();
        assert_eq!(started.timestamp(), 1_741_064_767);
        assert!(started < finished);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: IndexStatus = serde_json::from_str(r#"{"status": "paused"}"#).unwrap();

        assert_eq!(status.status, Status::Unknown("paused".to_string()));
        assert!(!status.status.is_terminal());
        assert!(!status.status.is_in_progress());
        assert_eq!(
            serde_json::to_value(&status.status).unwrap(),
            serde_json::json!("paused")
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Done.is_terminal());
        assert!(Status::Error.is_terminal());
        assert!(!Status::Queued.is_terminal());
        assert!(!Status::Running.is_terminal());
        assert!(!Status::NoJobs.is_terminal());
    }

    #[test]
    fn test_progress_never_divides_by_zero() {
        let mut status = IndexStatus::no_jobs();
        status.status = Status::Running;
        status.processed = 3;
        status.total = 0;
        assert_eq!(status.progress_percent(), 0);
    }

    #[test]
    fn test_progress_rounds_half_up() {
        let mut status = IndexStatus::no_jobs();
        status.total = 8;

        status.processed = 1;
        assert_eq!(status.progress_percent(), 13); // 12.5

        status.processed = 4;
        assert_eq!(status.progress_percent(), 50);

        status.processed = 8;
        assert_eq!(status.progress_percent(), 100);
    }

    #[test]
    fn test_job_id_accepts_string() {
        let id: JobId = serde_json::from_str(r#""mock-job-123""#).unwrap();
        assert_eq!(id.as_str(), "mock-job-123");
    }
}
