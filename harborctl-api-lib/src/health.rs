use serde::Deserialize;

use crate::client::{ApiError, HarborClient};

#[derive(Clone, Debug, Deserialize)]
pub struct OverallHealthStatus {
    pub status: String,

    #[serde(default)]
    pub components: Vec<ComponentHealthStatus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ComponentHealthStatus {
    pub name: String,
    pub status: String,
    pub error: Option<String>,
}

impl OverallHealthStatus {
    pub fn healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealthStatus {
    pub fn healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub async fn get_health(
    client: &HarborClient,
) -> Result<OverallHealthStatus, ApiError> {
    client.get_json("health").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_component_errors() {
        let raw = r#"{
            "status": "unhealthy",
            "components": [
                {"name": "core", "status": "healthy"},
                {"name": "database", "status": "unhealthy", "error": "connection refused"}
            ]
        }"#;

        let health: OverallHealthStatus = serde_json::from_str(raw).unwrap();
        assert!(!health.healthy());
        assert!(health.components[0].healthy());
        assert_eq!(
            health.components[1].error.as_deref(),
            Some("connection refused")
        );
    }
}
