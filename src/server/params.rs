//! Parameter types for the provider's MCP tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Parameters for fetching the provider schema.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SchemaParams {
    /// Limit the output to one resource type (asana_project or asana_task)
    #[serde(default)]
    pub resource_type: Option<String>,
}

/// Parameters for planning a change.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlanParams {
    /// The resource type: asana_project or asana_task
    pub resource_type: String,
    /// Current state, including "id". Omit when the resource does not exist yet.
    #[serde(default)]
    pub prior_state: Option<Value>,
    /// Desired configuration. Omit when the resource is being destroyed.
    #[serde(default)]
    pub proposed_state: Option<Value>,
}

/// Parameters for creating a resource.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateParams {
    /// The resource type: asana_project or asana_task
    pub resource_type: String,
    /// Resource configuration, keyed by field name
    pub config: Value,
}

/// Parameters for refreshing a resource.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadParams {
    /// The resource type: asana_project or asana_task
    pub resource_type: String,
    /// Last known state, including "id"
    pub state: Value,
}

/// Parameters for updating a resource in place.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateParams {
    /// The resource type. Only asana_project supports update.
    pub resource_type: String,
    /// Last known state, including "id"
    pub state: Value,
    /// Desired configuration, keyed by field name
    pub config: Value,
}

/// Parameters for deleting a resource.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteParams {
    /// The resource type: asana_project or asana_task
    pub resource_type: String,
    /// Last known state, including "id"
    pub state: Value,
}
