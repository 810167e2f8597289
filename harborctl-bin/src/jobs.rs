use std::future::Future;
use std::time::{Duration, UNIX_EPOCH};

use crossterm::style::Stylize;
use harborctl_api_lib::client::ApiError;
use harborctl_api_lib::job::JobRecord;
use harborctl_lib::schedule::ScheduleType;
use indicatif::{ProgressBar, ProgressStyle};

pub fn status_cell(status: &str) -> String {
    match status {
        "Success" | "finished" => status.green().to_string(),
        "Error" | "error" => status.red().to_string(),
        "Running" | "running" | "Pending" => status.cyan().to_string(),
        "Stopped" => status.yellow().to_string(),
        other => other.to_string(),
    }
}

pub fn history_header(title: &str) -> String {
    format!(
        "[{}]\t{}\t{}\t{}\t{}",
        title.cyan(),
        "kind".blue(),
        "status".blue(),
        "created".blue(),
        "updated".blue()
    )
}

pub fn history_row(record: &JobRecord) -> String {
    let id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_default();

    format!(
        " - {}\t{}\t{}\t{}\t{}",
        id,
        record.job_kind.as_deref().unwrap_or(""),
        status_cell(record.job_status.as_deref().unwrap_or("")),
        record.creation_time.as_deref().unwrap_or(""),
        record.update_time.as_deref().unwrap_or(""),
    )
}

/// Describe a configured schedule and its submitted parameters.
pub fn schedule_lines(record: Option<&JobRecord>) -> Vec<String> {
    let Some(record) = record else {
        return vec!["No schedule configured".to_string()];
    };

    let mut lines = vec![];

    if let Some(spec) = &record.schedule {
        let schedule = ScheduleType::from_spec(spec)
            .map(|schedule| schedule.to_string())
            .unwrap_or_else(|_| spec.kind.clone());

        lines.push(format!("schedule:\t{}", schedule));
        if let Some(cron) = &spec.cron {
            lines.push(format!("cron:\t{}", cron));
        }
        if let Some(next) = &spec.next_scheduled_time {
            lines.push(format!("next run:\t{}", next));
        }
    }

    if let Some(Ok(params)) = record.parameters::<serde_json::Value>() {
        if let Some(map) = params.as_object() {
            for (key, value) in map {
                lines.push(format!("{}:\t{}", key, value));
            }
        }
    }

    if lines.is_empty() {
        lines.push("No schedule configured".to_string());
    }

    lines
}

/// Epoch seconds to a readable timestamp; non-positive means "never".
pub fn format_epoch(secs: i64) -> String {
    if secs <= 0 {
        return "never".to_string();
    }

    let time = UNIX_EPOCH + Duration::from_secs(secs as u64);
    humantime::format_rfc3339_seconds(time).to_string()
}

/// Poll a job until it reaches a terminal status, showing a spinner.
pub async fn wait_for_job<F, Fut>(
    job_name: &str,
    interval: Duration,
    mut fetch: F,
) -> anyhow::Result<JobRecord>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobRecord, ApiError>>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    loop {
        let record = fetch().await?;

        let status = record
            .job_status
            .clone()
            .unwrap_or_else(|| "Pending".to_string());
        pb.set_message(format!("{}: {}", job_name, status));

        if record.is_finished() {
            pb.finish_and_clear();
            return Ok(record);
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_formatting_handles_never() {
        assert_eq!(format_epoch(-1), "never");
        assert_eq!(format_epoch(0), "never");
        assert_eq!(format_epoch(86_400), "1970-01-02T00:00:00Z");
    }

    #[test]
    fn missing_schedule_reports_itself() {
        assert_eq!(
            schedule_lines(None),
            vec!["No schedule configured".to_string()]
        );
    }
}
