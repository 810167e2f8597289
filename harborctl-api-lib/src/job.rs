use derive_more::{Display, Into};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::client::{ApiError, HarborClient, Page};

#[derive(
    Clone, Copy, Debug, Display, Into, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct JobId(pub i64);

/// The `{type, cron}` pair Harbor attaches to schedulable system jobs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_scheduled_time: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScheduleRequest {
    pub schedule: ScheduleSpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// One execution (or the configured schedule) of a system job. GC and
/// audit-log purge share this record shape.
#[derive(Clone, Debug, Deserialize)]
pub struct JobRecord {
    pub id: Option<JobId>,
    pub job_name: Option<String>,
    pub job_kind: Option<String>,
    pub job_status: Option<String>,
    pub schedule: Option<ScheduleSpec>,

    // Harbor encodes the submitted parameters as a JSON string.
    pub job_parameters: Option<String>,

    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

impl JobRecord {
    pub fn parameters<T: DeserializeOwned>(
        &self,
    ) -> Option<Result<T, serde_json::Error>> {
        self.job_parameters
            .as_deref()
            .map(serde_json::from_str)
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.job_status.as_deref(),
            Some("Success" | "Error" | "Stopped" | "finished" | "error")
        )
    }
}

pub async fn get_schedule(
    client: &HarborClient,
    root: &str,
) -> Result<Option<JobRecord>, ApiError> {
    client
        .get_json_opt(&format!("{root}/schedule"))
        .await
}

pub async fn create_schedule(
    client: &HarborClient,
    root: &str,
    request: &ScheduleRequest,
) -> Result<(), ApiError> {
    client
        .post_json(&format!("{root}/schedule"), request)
        .await
}

pub async fn update_schedule(
    client: &HarborClient,
    root: &str,
    request: &ScheduleRequest,
) -> Result<(), ApiError> {
    client
        .put_json(&format!("{root}/schedule"), request)
        .await
}

pub async fn list_history(
    client: &HarborClient,
    root: &str,
    page: u64,
    page_size: u64,
) -> Result<Page<JobRecord>, ApiError> {
    client.get_paged(root, page, page_size).await
}

pub async fn get_job(
    client: &HarborClient,
    root: &str,
    id: JobId,
) -> Result<JobRecord, ApiError> {
    client.get_json(&format!("{root}/{id}")).await
}

pub async fn get_job_log(
    client: &HarborClient,
    root: &str,
    id: JobId,
) -> Result<String, ApiError> {
    client.get_text(&format!("{root}/{id}/log")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_record_decodes_harbor_payload() {
        let raw = r#"{
            "id": 42,
            "job_name": "GARBAGE_COLLECTION",
            "job_kind": "MANUAL",
            "job_status": "Success",
            "job_parameters": "{\"delete_untagged\":true,\"dry_run\":false,\"workers\":2}",
            "creation_time": "2026-05-01T10:00:00Z",
            "update_time": "2026-05-01T10:03:12Z"
        }"#;

        let record: JobRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, Some(JobId(42)));
        assert!(record.is_finished());

        let params: Value = record.parameters().unwrap().unwrap();
        assert_eq!(params["workers"], json!(2));
        assert_eq!(params["delete_untagged"], json!(true));
    }

    #[test]
    fn schedule_spec_omits_empty_fields() {
        let spec = ScheduleSpec {
            kind: "Manual".to_string(),
            cron: None,
            next_scheduled_time: None,
        };

        let raw = serde_json::to_string(&ScheduleRequest {
            schedule: spec,
            parameters: None,
        })
        .unwrap();

        assert_eq!(raw, r#"{"schedule":{"type":"Manual"}}"#);
    }

    #[test]
    fn running_jobs_are_not_finished() {
        let record = JobRecord {
            id: Some(JobId(7)),
            job_name: None,
            job_kind: None,
            job_status: Some("Running".to_string()),
            schedule: None,
            job_parameters: None,
            creation_time: None,
            update_time: None,
        };

        assert!(!record.is_finished());
    }
}
