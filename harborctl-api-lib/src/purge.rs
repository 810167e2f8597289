use serde::{Deserialize, Serialize};

use crate::client::{ApiError, HarborClient, Page};
use crate::job::{
    self, JobId, JobRecord, ScheduleRequest, ScheduleSpec,
};

const PURGE_ROOT: &str = "system/purgeaudit";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurgeParams {
    pub audit_retention_hour: i64,

    /// Comma separated event types, e.g. "create,delete,pull".
    pub include_event_types: String,

    pub dry_run: bool,
}

impl Default for PurgeParams {
    fn default() -> Self {
        Self {
            audit_retention_hour: 24 * 7,
            include_event_types: "create,delete,pull".to_string(),
            dry_run: false,
        }
    }
}

fn request(
    spec: ScheduleSpec,
    params: &PurgeParams,
) -> Result<ScheduleRequest, ApiError> {
    let parameters = serde_json::to_value(params)?;

    Ok(ScheduleRequest {
        schedule: spec,
        parameters: Some(parameters),
    })
}

pub async fn get_schedule(
    client: &HarborClient,
) -> Result<Option<JobRecord>, ApiError> {
    job::get_schedule(client, PURGE_ROOT).await
}

pub async fn create_schedule(
    client: &HarborClient,
    spec: ScheduleSpec,
    params: &PurgeParams,
) -> Result<(), ApiError> {
    job::create_schedule(client, PURGE_ROOT, &request(spec, params)?).await
}

pub async fn update_schedule(
    client: &HarborClient,
    spec: ScheduleSpec,
    params: &PurgeParams,
) -> Result<(), ApiError> {
    job::update_schedule(client, PURGE_ROOT, &request(spec, params)?).await
}

pub async fn run_now(
    client: &HarborClient,
    params: &PurgeParams,
) -> Result<(), ApiError> {
    let spec = ScheduleSpec {
        kind: "Manual".to_string(),
        cron: None,
        next_scheduled_time: None,
    };
    create_schedule(client, spec, params).await
}

pub async fn list_history(
    client: &HarborClient,
    page: u64,
    page_size: u64,
) -> Result<Page<JobRecord>, ApiError> {
    job::list_history(client, PURGE_ROOT, page, page_size).await
}

pub async fn get_job(
    client: &HarborClient,
    id: JobId,
) -> Result<JobRecord, ApiError> {
    job::get_job(client, PURGE_ROOT, id).await
}

pub async fn get_job_log(
    client: &HarborClient,
    id: JobId,
) -> Result<String, ApiError> {
    job::get_job_log(client, PURGE_ROOT, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retention_is_one_week() {
        let params = PurgeParams::default();
        assert_eq!(params.audit_retention_hour, 168);
        assert!(!params.dry_run);
    }
}
