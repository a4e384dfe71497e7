//! Wire types for the Asana REST API.
//!
//! Requests and responses are wrapped in a `{"data": ...}` envelope. Only
//! the fields the provider manages are modeled; everything else in a
//! response is ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// A globally unique identifier for an Asana resource, as a decimal string.
pub type Gid = String;

/// Generic wrapper for Asana API single-object responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DataWrapper<T> {
    /// The wrapped data.
    pub data: T,
}

/// Generic wrapper for request bodies.
#[derive(Debug, Clone, Serialize)]
pub struct DataBody<T> {
    /// The wrapped data.
    pub data: T,
}

impl<T> DataBody<T> {
    /// Wrap a request payload.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Accept an identifier as either a JSON integer or a string.
///
/// Older API responses carry numeric `id`s; current ones carry string `gid`s
/// wrapping the same integer.
fn gid_from_number_or_string<'de, D>(deserializer: D) -> Result<Gid, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGid {
        Number(u64),
        Text(String),
    }

    Ok(match RawGid::deserialize(deserializer)? {
        RawGid::Number(n) => n.to_string(),
        RawGid::Text(s) => s,
    })
}

/// A reference to another resource (workspace, project).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRef {
    /// The unique identifier.
    #[serde(deserialize_with = "gid_from_number_or_string")]
    pub gid: Gid,
}

/// A project as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// The unique identifier.
    #[serde(deserialize_with = "gid_from_number_or_string")]
    pub gid: Gid,

    /// The project name.
    #[serde(default)]
    pub name: String,

    /// Free-form notes. The API returns an empty string when unset.
    #[serde(default)]
    pub notes: Option<String>,

    /// The project color, or null.
    #[serde(default)]
    pub color: Option<String>,

    /// The owning workspace or organization.
    #[serde(default)]
    pub workspace: Option<ResourceRef>,
}

/// A task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    /// The unique identifier.
    #[serde(deserialize_with = "gid_from_number_or_string")]
    pub gid: Gid,

    /// The task name.
    #[serde(default)]
    pub name: String,

    /// Free-form notes. The API returns an empty string when unset.
    #[serde(default)]
    pub notes: Option<String>,

    /// The workspace the task lives in.
    #[serde(default)]
    pub workspace: Option<ResourceRef>,

    /// Projects the task belongs to, in API order.
    #[serde(default)]
    pub projects: Vec<ResourceRef>,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub layout: String,
    pub workspace: Gid,
    pub public: bool,
}

/// Body of `PUT /projects/{gid}`.
///
/// `notes` and `color` are always sent so that dropping them from
/// configuration clears them remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    pub notes: String,
    pub color: Option<String>,
    pub public: bool,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Gid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialization_with_string_gid() {
        let json = r#"{
            "gid": "1001",
            "name": "Launch Plan",
            "notes": "",
            "color": "dark-blue",
            "workspace": {"gid": "12345", "name": "Acme"},
            "permalink_url": "https://app.asana.com/0/1001"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();

        assert_eq!(project.gid, "1001");
        assert_eq!(project.name, "Launch Plan");
        assert_eq!(project.color.as_deref(), Some("dark-blue"));
        assert_eq!(project.workspace.unwrap().gid, "12345");
    }

    #[test]
    fn test_numeric_gid_is_stringified() {
        let json = r#"{"gid": 1001, "name": "Old style", "workspace": {"gid": 12345}}"#;
        let project: Project = serde_json::from_str(json).unwrap();

        assert_eq!(project.gid, "1001");
        assert_eq!(project.workspace.unwrap().gid, "12345");
    }

    #[test]
    fn test_task_projects_keep_api_order() {
        let json = r#"{
            "data": {
                "gid": "77",
                "name": "Write brief",
                "workspace": {"gid": "12345"},
                "projects": [{"gid": "3"}, {"gid": "1"}, {"gid": "2"}]
            }
        }"#;
        let wrapper: DataWrapper<Task> = serde_json::from_str(json).unwrap();
        let gids: Vec<_> = wrapper.data.projects.iter().map(|p| p.gid.as_str()).collect();

        assert_eq!(gids, ["3", "1", "2"]);
    }

    #[test]
    fn test_create_project_request_skips_absent_optionals() {
        let body = DataBody::new(CreateProjectRequest {
            name: "Launch Plan".into(),
            notes: None,
            color: None,
            layout: "board".into(),
            workspace: "12345".into(),
            public: false,
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"data": {
                "name": "Launch Plan",
                "layout": "board",
                "workspace": "12345",
                "public": false
            }})
        );
    }

    #[test]
    fn test_update_project_request_sends_clearing_values() {
        let body = UpdateProjectRequest {
            name: "Renamed".into(),
            notes: String::new(),
            color: None,
            public: true,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"name": "Renamed", "notes": "", "color": null, "public": true})
        );
    }

    #[test]
    fn test_create_task_request_sends_numeric_projects() {
        let body = CreateTaskRequest {
            name: "Write brief".into(),
            notes: None,
            workspace: None,
            projects: vec![3, 1],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"name": "Write brief", "projects": [3, 1]})
        );
    }
}
