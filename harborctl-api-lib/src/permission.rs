use serde::Deserialize;

use crate::client::{ApiError, HarborClient};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PermissionEntry {
    pub resource: String,
    pub action: String,
}

/// The catalogue of grantable permissions, split by scope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub system: Vec<PermissionEntry>,

    #[serde(default)]
    pub project: Vec<PermissionEntry>,
}

pub const SYSTEM_SCOPE: &str = "system";
pub const PROJECT_SCOPE: &str = "project";

impl Permissions {
    /// Flatten into (scope, entry) pairs, system scope first. The order
    /// is stable so an index into it identifies an entry.
    pub fn scoped(&self) -> Vec<(&'static str, &PermissionEntry)> {
        self.system
            .iter()
            .map(|entry| (SYSTEM_SCOPE, entry))
            .chain(
                self.project
                    .iter()
                    .map(|entry| (PROJECT_SCOPE, entry)),
            )
            .collect()
    }
}

pub async fn get_permissions(
    client: &HarborClient,
) -> Result<Permissions, ApiError> {
    client.get_json("permissions").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_keeps_system_entries_first() {
        let raw = r#"{
            "system": [
                {"resource": "registry", "action": "push"},
                {"resource": "garbage-collection", "action": "read"}
            ],
            "project": [
                {"resource": "repository", "action": "pull"}
            ]
        }"#;

        let permissions: Permissions = serde_json::from_str(raw).unwrap();
        let scoped = permissions.scoped();

        assert_eq!(scoped.len(), 3);
        assert_eq!(scoped[0].0, SYSTEM_SCOPE);
        assert_eq!(scoped[1].1.resource, "garbage-collection");
        assert_eq!(scoped[2].0, PROJECT_SCOPE);
    }
}
