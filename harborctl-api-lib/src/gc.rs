use serde::{Deserialize, Serialize};

use crate::client::{ApiError, HarborClient, Page};
use crate::job::{
    self, JobId, JobRecord, ScheduleRequest, ScheduleSpec,
};

const GC_ROOT: &str = "system/gc";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GcParams {
    pub delete_untagged: bool,
    pub workers: i64,
    pub dry_run: bool,
}

impl Default for GcParams {
    fn default() -> Self {
        Self {
            delete_untagged: false,
            workers: 1,
            dry_run: false,
        }
    }
}

fn request(
    spec: ScheduleSpec,
    params: &GcParams,
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
    job::get_schedule(client, GC_ROOT).await
}

pub async fn create_schedule(
    client: &HarborClient,
    spec: ScheduleSpec,
    params: &GcParams,
) -> Result<(), ApiError> {
    job::create_schedule(client, GC_ROOT, &request(spec, params)?).await
}

pub async fn update_schedule(
    client: &HarborClient,
    spec: ScheduleSpec,
    params: &GcParams,
) -> Result<(), ApiError> {
    job::update_schedule(client, GC_ROOT, &request(spec, params)?).await
}

/// Trigger a one-off run. Harbor models this as posting a `Manual`
/// schedule.
pub async fn run_now(
    client: &HarborClient,
    params: &GcParams,
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
    job::list_history(client, GC_ROOT, page, page_size).await
}

pub async fn get_job(
    client: &HarborClient,
    id: JobId,
) -> Result<JobRecord, ApiError> {
    job::get_job(client, GC_ROOT, id).await
}

pub async fn get_job_log(
    client: &HarborClient,
    id: JobId,
) -> Result<String, ApiError> {
    job::get_job_log(client, GC_ROOT, id).await
}
