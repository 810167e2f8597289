use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

use crate::client::{ApiError, HarborClient, Page};
use crate::permission::PermissionEntry;

const ROBOT_ROOT: &str = "robots";

#[derive(
    Clone, Copy, Debug, Display, Into, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct RobotId(pub i64);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Access {
    pub resource: String,
    pub action: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotPermission {
    pub kind: String,
    pub namespace: String,
    pub access: Vec<Access>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RobotCreate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lifetime in days; -1 for never expiring.
    pub duration: i64,

    pub level: String,
    pub disable: bool,
    pub permissions: Vec<RobotPermission>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RobotCreated {
    pub id: RobotId,
    pub name: String,

    /// Shown exactly once; Harbor never returns it again.
    pub secret: String,

    pub expires_at: Option<i64>,
    pub creation_time: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub name: String,
    pub description: Option<String>,

    #[serde(default)]
    pub disable: bool,

    pub level: Option<String>,
    pub duration: Option<i64>,
    pub expires_at: Option<i64>,
    pub permissions: Option<Vec<RobotPermission>>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

/// Assemble a system level creation request from widget-picked
/// permission entries. Project-scope grants apply to all projects
/// (namespace `*`).
pub fn system_robot(
    name: impl Into<String>,
    description: Option<String>,
    duration: i64,
    picked: &[(&str, &PermissionEntry)],
) -> RobotCreate {
    let mut permissions: Vec<RobotPermission> = vec![];

    for (scope, entry) in picked {
        let access = Access {
            resource: entry.resource.clone(),
            action: entry.action.clone(),
        };

        let namespace = match *scope {
            crate::permission::PROJECT_SCOPE => "*",
            _ => "/",
        };

        match permissions
            .iter_mut()
            .find(|p| p.kind == *scope)
        {
            Some(permission) => permission.access.push(access),
            None => permissions.push(RobotPermission {
                kind: scope.to_string(),
                namespace: namespace.to_string(),
                access: vec![access],
            }),
        }
    }

    RobotCreate {
        name: name.into(),
        description,
        duration,
        level: "system".to_string(),
        disable: false,
        permissions,
    }
}

pub async fn list_robots(
    client: &HarborClient,
    page: u64,
    page_size: u64,
) -> Result<Page<Robot>, ApiError> {
    client.get_paged(ROBOT_ROOT, page, page_size).await
}

pub async fn create_robot(
    client: &HarborClient,
    robot: &RobotCreate,
) -> Result<RobotCreated, ApiError> {
    client.post_json_response(ROBOT_ROOT, robot).await
}

pub async fn delete_robot(
    client: &HarborClient,
    id: RobotId,
) -> Result<(), ApiError> {
    client
        .delete(&format!("{ROBOT_ROOT}/{id}"))
        .await
}
