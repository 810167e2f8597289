use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::client::{ApiError, HarborClient};

const CONFIG_PATH: &str = "configurations";

/// One server setting as reported by `GET /configurations`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ConfigItem {
    pub value: Value,

    #[serde(default)]
    pub editable: bool,
}

pub type Configurations = BTreeMap<String, ConfigItem>;

pub async fn get_configurations(
    client: &HarborClient,
) -> Result<Configurations, ApiError> {
    client.get_json(CONFIG_PATH).await
}

/// Push a partial update; only the supplied keys are modified.
pub async fn update_configurations(
    client: &HarborClient,
    changes: &BTreeMap<String, Value>,
) -> Result<(), ApiError> {
    client.put_json(CONFIG_PATH, changes).await
}

/// Strip the `{value, editable}` wrappers down to plain values.
pub fn plain_values(configurations: &Configurations) -> BTreeMap<String, Value> {
    configurations
        .iter()
        .map(|(key, item)| (key.clone(), item.value.clone()))
        .collect()
}
