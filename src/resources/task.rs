//! The `asana_task` resource.
//!
//! Tasks have no in-place update: every modeled field forces replacement.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{non_empty, unless_gone, Resource, ResourceData};
use crate::client::AsanaClient;
use crate::schema::{FieldSchema, FieldType, ResourceSchema};
use crate::types::CreateTaskRequest;
use crate::Error;

/// Configurable fields of an `asana_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Filled in from the API when only projects are configured.
    #[serde(default)]
    pub workspace: Option<String>,
    /// Numeric project IDs, in the order the API lists them.
    #[serde(default)]
    pub projects: Vec<String>,
}

impl TaskFields {
    /// Parse the configured project IDs into the integers the API expects.
    pub fn project_ids(&self) -> Result<Vec<i64>, Error> {
        self.projects
            .iter()
            .map(|value| {
                value.parse::<i64>().map_err(|source| Error::InvalidProjectId {
                    value: value.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Asana task lifecycle.
pub struct TaskResource;

impl Resource for TaskResource {
    const TYPE_NAME: &'static str = "asana_task";

    type Fields = TaskFields;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::required_string(
                    "name",
                    "Name of the task. This is generally a short sentence fragment that fits \
                     on a line in the UI for maximum readability. However, it can be longer.",
                )
                .force_new(),
                FieldSchema::optional(
                    "notes",
                    FieldType::String,
                    "More detailed, free-form textual information associated with the task.",
                )
                .force_new(),
                FieldSchema::optional(
                    "workspace",
                    FieldType::String,
                    "The workspace this task is associated with. Once created, a task cannot \
                     be moved to a different workspace. Not needed if projects are specified.",
                )
                .force_new()
                .computed(),
                FieldSchema::optional(
                    "projects",
                    FieldType::StringList,
                    "Projects this task is associated with. Can only be set at creation time.",
                )
                .force_new(),
            ],
        )
    }

    fn validate(fields: &TaskFields) -> Result<(), Error> {
        let has_workspace = fields.workspace.as_deref().is_some_and(|w| !w.is_empty());
        if has_workspace || !fields.projects.is_empty() {
            return Ok(());
        }
        Err(Error::InvalidConfig {
            resource_type: Self::TYPE_NAME.to_string(),
            problems: vec!["workspace is required when projects is empty".to_string()],
        })
    }

    async fn create(
        client: &AsanaClient,
        data: &mut ResourceData<TaskFields>,
    ) -> Result<(), Error> {
        let fields = &data.fields;
        let request = CreateTaskRequest {
            name: fields.name.clone(),
            notes: fields.notes.clone(),
            workspace: fields.workspace.clone(),
            projects: fields.project_ids()?,
        };
        debug!(?request, "creating task");

        let task = client.create_task(&request).await?;
        data.set_id(task.gid);

        info!(id = %data.id(), "created task");
        Ok(())
    }

    async fn read(client: &AsanaClient, data: &mut ResourceData<TaskFields>) -> Result<(), Error> {
        let id = data.require_id(Self::TYPE_NAME)?.to_string();
        let result = client.find_task_by_id(&id).await;
        let Some(task) = unless_gone(result, data, Self::TYPE_NAME)? else {
            return Ok(());
        };

        let fields = &mut data.fields;
        fields.name = task.name;
        fields.notes = non_empty(task.notes);
        if let Some(workspace) = task.workspace {
            fields.workspace = Some(workspace.gid);
        }
        fields.projects = task.projects.into_iter().map(|p| p.gid).collect();

        Ok(())
    }

    async fn delete(
        client: &AsanaClient,
        data: &mut ResourceData<TaskFields>,
    ) -> Result<(), Error> {
        let id = data.require_id(Self::TYPE_NAME)?.to_string();

        match client.delete_task(&id).await {
            Ok(()) => info!(id = %id, "deleted task"),
            Err(e) if e.is_not_found() => debug!(id = %id, "task already deleted"),
            Err(e) => return Err(e),
        }

        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{not_found, test_client};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn brief(projects: &[&str]) -> TaskFields {
        TaskFields {
            name: "Write brief".into(),
            notes: Some("One page max".into()),
            workspace: None,
            projects: projects.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn task_body(projects: &[&str]) -> serde_json::Value {
        let projects: Vec<_> = projects
            .iter()
            .map(|gid| serde_json::json!({"gid": gid, "name": "A project"}))
            .collect();
        serde_json::json!({
            "data": {
                "gid": "77",
                "name": "Write brief",
                "notes": "One page max",
                "workspace": {"gid": "12345"},
                "projects": projects
            }
        })
    }

    #[test]
    fn test_project_ids_parse() {
        assert_eq!(brief(&["1001", "1002"]).project_ids().unwrap(), vec![1001, 1002]);
        assert!(brief(&[]).project_ids().unwrap().is_empty());
    }

    #[test]
    fn test_validate_requires_workspace_or_projects() {
        assert!(TaskResource::validate(&brief(&["1001"])).is_ok());

        let with_workspace = TaskFields {
            workspace: Some("12345".into()),
            ..brief(&[])
        };
        assert!(TaskResource::validate(&with_workspace).is_ok());

        assert!(matches!(
            TaskResource::validate(&brief(&[])),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_every_field_forces_replacement() {
        let schema = TaskResource::schema();
        assert!(schema.fields.iter().all(|f| f.force_new));
    }

    #[tokio::test]
    async fn test_create_with_projects() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .and(body_json(serde_json::json!({"data": {
                "name": "Write brief",
                "notes": "One page max",
                "projects": [1002, 1001]
            }})))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_body(&["1002", "1001"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1002", "1001"]));
        TaskResource::create(&client, &mut data).await.unwrap();

        assert_eq!(data.id(), "77");
    }

    #[tokio::test]
    async fn test_create_with_bad_project_id_makes_no_remote_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_body(&[])))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1001", "launch"]));
        let result = TaskResource::create(&client, &mut data).await;

        match result {
            Err(Error::InvalidProjectId { value, .. }) => assert_eq!(value, "launch"),
            other => panic!("expected InvalidProjectId, got {other:?}"),
        }
        assert!(data.is_absent());
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips_echoed_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_body(&["1002", "1001"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks/77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body(&["1002", "1001"])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(TaskFields {
            workspace: Some("12345".into()),
            ..brief(&["1002", "1001"])
        });
        let configured = data.fields.clone();

        TaskResource::create(&client, &mut data).await.unwrap();
        TaskResource::read(&client, &mut data).await.unwrap();

        assert_eq!(data.fields, configured);
    }

    #[tokio::test]
    async fn test_read_fills_workspace_from_projects_only_config() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tasks/77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body(&["1001"])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1001"])).with_id("77");
        TaskResource::read(&client, &mut data).await.unwrap();

        assert_eq!(data.fields.workspace.as_deref(), Some("12345"));
        assert_eq!(data.fields.projects, vec!["1001"]);
    }

    #[tokio::test]
    async fn test_read_not_found_clears_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tasks/77"))
            .respond_with(not_found("task", "77"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1001"])).with_id("77");
        TaskResource::read(&client, &mut data).await.unwrap();

        assert!(data.is_absent());
    }

    #[tokio::test]
    async fn test_delete_not_found_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/tasks/77"))
            .respond_with(not_found("task", "77"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1001"])).with_id("77");
        TaskResource::delete(&client, &mut data).await.unwrap();

        assert!(data.is_absent());
    }

    #[tokio::test]
    async fn test_delete_other_error_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/tasks/77"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut data = ResourceData::new(brief(&["1001"])).with_id("77");

        assert!(TaskResource::delete(&client, &mut data).await.is_err());
        assert_eq!(data.id(), "77");
    }
}
