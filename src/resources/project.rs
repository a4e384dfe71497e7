//! The `asana_project` resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::{non_empty, unless_gone, Resource, ResourceData, Updatable};
use crate::client::AsanaClient;
use crate::schema::{FieldSchema, FieldType, ResourceSchema};
use crate::types::{CreateProjectRequest, UpdateProjectRequest};
use crate::Error;

/// Colors Asana accepts for a project.
pub const PROJECT_COLORS: &[&str] = &[
    "dark-pink",
    "dark-green",
    "dark-blue",
    "dark-red",
    "dark-teal",
    "dark-brown",
    "dark-orange",
    "dark-purple",
    "dark-warm-gray",
    "light-pink",
    "light-green",
    "light-blue",
    "light-red",
    "light-teal",
    "light-yellow",
    "light-orange",
    "light-purple",
    "light-warm-gray",
];

const PROJECT_LAYOUTS: &[&str] = &["list", "board"];

/// Project color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectColor {
    DarkPink,
    DarkGreen,
    DarkBlue,
    DarkRed,
    DarkTeal,
    DarkBrown,
    DarkOrange,
    DarkPurple,
    DarkWarmGray,
    LightPink,
    LightGreen,
    LightBlue,
    LightRed,
    LightTeal,
    LightYellow,
    LightOrange,
    LightPurple,
    LightWarmGray,
}

impl ProjectColor {
    pub const ALL: [ProjectColor; 18] = [
        ProjectColor::DarkPink,
        ProjectColor::DarkGreen,
        ProjectColor::DarkBlue,
        ProjectColor::DarkRed,
        ProjectColor::DarkTeal,
        ProjectColor::DarkBrown,
        ProjectColor::DarkOrange,
        ProjectColor::DarkPurple,
        ProjectColor::DarkWarmGray,
        ProjectColor::LightPink,
        ProjectColor::LightGreen,
        ProjectColor::LightBlue,
        ProjectColor::LightRed,
        ProjectColor::LightTeal,
        ProjectColor::LightYellow,
        ProjectColor::LightOrange,
        ProjectColor::LightPurple,
        ProjectColor::LightWarmGray,
    ];

    /// The API spelling of this color.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectColor::DarkPink => "dark-pink",
            ProjectColor::DarkGreen => "dark-green",
            ProjectColor::DarkBlue => "dark-blue",
            ProjectColor::DarkRed => "dark-red",
            ProjectColor::DarkTeal => "dark-teal",
            ProjectColor::DarkBrown => "dark-brown",
            ProjectColor::DarkOrange => "dark-orange",
            ProjectColor::DarkPurple => "dark-purple",
            ProjectColor::DarkWarmGray => "dark-warm-gray",
            ProjectColor::LightPink => "light-pink",
            ProjectColor::LightGreen => "light-green",
            ProjectColor::LightBlue => "light-blue",
            ProjectColor::LightRed => "light-red",
            ProjectColor::LightTeal => "light-teal",
            ProjectColor::LightYellow => "light-yellow",
            ProjectColor::LightOrange => "light-orange",
            ProjectColor::LightPurple => "light-purple",
            ProjectColor::LightWarmGray => "light-warm-gray",
        }
    }
}

impl fmt::Display for ProjectColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown project color: {s}"))
    }
}

/// Project view layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    List,
    #[default]
    Board,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::List => "list",
            Layout::Board => "board",
        }
    }
}

/// Configurable fields of an `asana_project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub color: Option<ProjectColor>,
    /// Sent on create only; the API does not echo it back.
    #[serde(default)]
    pub layout: Layout,
    pub workspace: String,
    /// Write-only: the API does not return it, so drift goes undetected.
    #[serde(default)]
    pub public: bool,
}

/// Asana project lifecycle.
pub struct ProjectResource;

impl Resource for ProjectResource {
    const TYPE_NAME: &'static str = "asana_project";

    type Fields = ProjectFields;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::required_string(
                    "name",
                    "Name of the project. This is generally a short sentence fragment \
                     that fits on a line in the UI for maximum readability.",
                ),
                FieldSchema::optional(
                    "notes",
                    FieldType::String,
                    "More detailed, free-form textual information associated with the project.",
                ),
                FieldSchema::optional("color", FieldType::String, "Color of the project.")
                    .one_of(PROJECT_COLORS),
                FieldSchema::optional(
                    "layout",
                    FieldType::String,
                    "The layout (board or list view) of the project.",
                )
                .one_of(PROJECT_LAYOUTS)
                .with_default(json!(Layout::Board.as_str())),
                FieldSchema::required_string(
                    "workspace",
                    "The workspace or organization that the project belongs to.",
                )
                .force_new(),
                FieldSchema::optional(
                    "public",
                    FieldType::Bool,
                    "True if the project is public to the organization.",
                )
                .with_default(json!(false)),
            ],
        )
    }

    async fn create(
        client: &AsanaClient,
        data: &mut ResourceData<ProjectFields>,
    ) -> Result<(), Error> {
        let fields = &data.fields;
        let request = CreateProjectRequest {
            name: fields.name.clone(),
            notes: fields.notes.clone(),
            color: fields.color.map(|c| c.as_str().to_string()),
            layout: fields.layout.as_str().to_string(),
            workspace: fields.workspace.clone(),
            public: fields.public,
        };
        debug!(?request, "creating project");

        let project = client.create_project(&request).await?;
        data.set_id(project.gid);

        info!(id = %data.id(), workspace = %data.fields.workspace, "created project");
        Ok(())
    }

    async fn read(
        client: &AsanaClient,
        data: &mut ResourceData<ProjectFields>,
    ) -> Result<(), Error> {
        let id = data.require_id(Self::TYPE_NAME)?.to_string();
        let result = client.find_project_by_id(&id).await;
        let Some(project) = unless_gone(result, data, Self::TYPE_NAME)? else {
            return Ok(());
        };

        let fields = &mut data.fields;
        fields.name = project.name;
        fields.notes = non_empty(project.notes);
        fields.color = match non_empty(project.color) {
            None => None,
            Some(raw) => match raw.parse() {
                Ok(color) => Some(color),
                Err(_) => {
                    warn!(id = %id, color = %raw, "project has a color outside the palette");
                    None
                }
            },
        };
        if let Some(workspace) = project.workspace {
            fields.workspace = workspace.gid;
        }

        Ok(())
    }

    async fn delete(
        client: &AsanaClient,
        data: &mut ResourceData<ProjectFields>,
    ) -> Result<(), Error> {
        let id = data.require_id(Self::TYPE_NAME)?.to_string();

        match client.delete_project(&id).await {
            Ok(()) => info!(id = %id, "deleted project"),
            Err(e) if e.is_not_found() => debug!(id = %id, "project already deleted"),
            Err(e) => return Err(e),
        }

        data.clear_id();
        Ok(())
    }
}

impl Updatable for ProjectResource {
    async fn update(
        client: &AsanaClient,
        data: &mut ResourceData<ProjectFields>,
    ) -> Result<(), Error> {
        let id = data.require_id(Self::TYPE_NAME)?.to_string();
        let fields = &data.fields;
        let request = UpdateProjectRequest {
            name: fields.name.clone(),
            notes: fields.notes.clone().unwrap_or_default(),
            color: fields.color.map(|c| c.as_str().to_string()),
            public: fields.public,
        };
        debug!(id = %id, ?request, "updating project");

        let result = client.update_project(&id, &request).await;
        if unless_gone(result, data, Self::TYPE_NAME)?.is_some() {
            info!(id = %id, "updated project");
        }

        Ok(())
    }
}
