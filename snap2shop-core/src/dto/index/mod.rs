//! Indexing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::index::{JobId, Status};

/// Form body that asks the backend to index a shop's catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerIndexing {
    pub shop_domain: String,
}

/// Backend acknowledgement of a newly enqueued indexing job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexingTriggered {
    pub job_id: JobId,

    /// Initial status of the job, normally `queued`
    #[serde(default = "queued")]
    pub status: Status,
}

fn queued() -> Status {
    Status::Queued
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_integer_job_id() {
        let triggered: IndexingTriggered =
            serde_json::from_str(r#"{"job_id": 12, "status": "queued"}"#).unwrap();
        assert_eq!(triggered.job_id.as_str(), "12");
        assert_eq!(triggered.status, Status::Queued);
    }

    #[test]
    fn test_status_defaults_to_queued() {
        let triggered: IndexingTriggered =
            serde_json::from_str(r#"{"job_id": "mock-job-123"}"#).unwrap();
        assert_eq!(triggered.status, Status::Queued);
    }
}
