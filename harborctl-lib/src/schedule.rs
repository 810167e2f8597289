use std::fmt::Display;
use std::str::FromStr;

use harborctl_api_lib::job::ScheduleSpec;

/// A user-facing schedule choice. The named variants carry the cron
/// presets Harbor's own UI submits for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleType {
    None,
    Hourly,
    Daily,
    Weekly,
    Custom(String),
}

const HOURLY_CRON: &str = "0 0 * * * *";
const DAILY_CRON: &str = "0 0 0 * * *";
const WEEKLY_CRON: &str = "0 0 0 * * 0";

impl ScheduleType {
    pub fn custom(cron: &str) -> anyhow::Result<Self> {
        if !is_basic_cron(cron) {
            anyhow::bail!(
                "'{}' is not a cron expression (expected 6 space separated fields)",
                cron
            );
        }
        Ok(Self::Custom(cron.to_string()))
    }

    pub fn to_spec(&self) -> ScheduleSpec {
        let (kind, cron) = match self {
            Self::None => ("None", None),
            Self::Hourly => ("Hourly", Some(HOURLY_CRON.to_string())),
            Self::Daily => ("Daily", Some(DAILY_CRON.to_string())),
            Self::Weekly => ("Weekly", Some(WEEKLY_CRON.to_string())),
            Self::Custom(cron) => ("Custom", Some(cron.clone())),
        };

        ScheduleSpec {
            kind: kind.to_string(),
            cron,
            next_scheduled_time: None,
        }
    }

    pub fn from_spec(spec: &ScheduleSpec) -> anyhow::Result<Self> {
        match spec.kind.as_str() {
            "None" => Ok(Self::None),
            "Hourly" => Ok(Self::Hourly),
            "Daily" => Ok(Self::Daily),
            "Weekly" => Ok(Self::Weekly),
            "Custom" => {
                let cron = spec.cron.clone().ok_or_else(|| {
                    anyhow::anyhow!("Custom schedule without a cron string")
                })?;
                Ok(Self::Custom(cron))
            }
            other => anyhow::bail!("Unknown schedule type '{}'", other),
        }
    }
}

impl FromStr for ScheduleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Self::custom(s),
        }
    }
}

impl Display for ScheduleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Hourly => write!(f, "hourly"),
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Custom(cron) => write!(f, "{}", cron),
        }
    }
}

/// Shape check for Harbor's 6-field (seconds first) cron strings. Field
/// contents are left to the server; this only rejects obvious garbage.
pub fn is_basic_cron(s: &str) -> bool {
    let fields: Vec<&str> = s.split_whitespace().collect();
    if fields.len() != 6 {
        return false;
    }

    fields.iter().all(|field| {
        field.chars().all(|c| {
            c.is_ascii_digit() || matches!(c, '*' | ',' | '-' | '/')
        })
    })
}
