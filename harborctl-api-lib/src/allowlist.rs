use serde::{Deserialize, Serialize};

use crate::client::{ApiError, HarborClient};

const ALLOWLIST_PATH: &str = "system/CVEAllowlist";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CveAllowlist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    /// Expiry as epoch seconds; `None` means the list never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    #[serde(default)]
    pub items: Vec<CveItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CveItem {
    pub cve_id: String,
}

impl CveAllowlist {
    /// Apply `--add`/`--remove` style edits: additions keep their given
    /// order after the existing entries, duplicates are dropped, and
    /// removals win over simultaneous additions.
    pub fn apply_edits(&mut self, add: &[String], remove: &[String]) {
        for cve_id in add {
            let exists = self
                .items
                .iter()
                .any(|item| &item.cve_id == cve_id);
            if !exists {
                self.items.push(CveItem {
                    cve_id: cve_id.clone(),
                });
            }
        }

        self.items
            .retain(|item| !remove.contains(&item.cve_id));
    }
}

pub async fn get_system_allowlist(
    client: &HarborClient,
) -> Result<CveAllowlist, ApiError> {
    client.get_json(ALLOWLIST_PATH).await
}

pub async fn update_system_allowlist(
    client: &HarborClient,
    allowlist: &CveAllowlist,
) -> Result<(), ApiError> {
    client.put_json(ALLOWLIST_PATH, allowlist).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(allowlist: &CveAllowlist) -> Vec<&str> {
        allowlist
            .items
            .iter()
            .map(|item| item.cve_id.as_str())
            .collect()
    }

    #[test]
    fn edits_merge_without_duplicates() {
        let mut allowlist = CveAllowlist {
            items: vec![
                CveItem {
                    cve_id: "CVE-2024-0001".to_string(),
                },
                CveItem {
                    cve_id: "CVE-2024-0002".to_string(),
                },
            ],
            ..CveAllowlist::default()
        };

        allowlist.apply_edits(
            &[
                "CVE-2024-0002".to_string(),
                "CVE-2025-1111".to_string(),
            ],
            &["CVE-2024-0001".to_string()],
        );

        assert_eq!(ids(&allowlist), vec!["CVE-2024-0002", "CVE-2025-1111"]);
    }

    #[test]
    fn removal_wins_over_simultaneous_addition() {
        let mut allowlist = CveAllowlist::default();

        allowlist.apply_edits(
            &["CVE-2025-2222".to_string()],
            &["CVE-2025-2222".to_string()],
        );

        assert!(allowlist.items.is_empty());
    }

    #[test]
    fn decodes_harbor_payload() {
        let raw = r#"{
            "id": 1,
            "items": [{"cve_id": "CVE-2021-44228"}],
            "expires_at": 1780000000,
            "creation_time": "2026-01-02T00:00:00Z",
            "update_time": "2026-01-03T00:00:00Z"
        }"#;

        let allowlist: CveAllowlist = serde_json::from_str(raw).unwrap();
        assert_eq!(allowlist.items[0].cve_id, "CVE-2021-44228");
        assert_eq!(allowlist.expires_at, Some(1_780_000_000));
    }
}
