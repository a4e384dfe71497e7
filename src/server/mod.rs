//! MCP server exposing the provider's resource lifecycle to a host.
//!
//! The host drives each managed resource through `resource_plan`,
//! `resource_create`, `resource_read`, `resource_update` and
//! `resource_delete`, exchanging state as JSON objects keyed by field name
//! plus an `id` slot.

mod helpers;
pub mod params;

use crate::client::AsanaClient;
use crate::config::ProviderConfig;
use crate::provider::AsanaProvider;
use crate::Error;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, ErrorData as McpError, Implementation, ProtocolVersion, ServerCapabilities,
    ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use helpers::*;
pub use params::*;

/// MCP server for the Asana provider.
#[derive(Debug, Clone)]
pub struct ProviderServer {
    client: Option<AsanaClient>,
    tool_router: ToolRouter<ProviderServer>,
}

#[tool_router]
impl ProviderServer {
    /// Create a server configured from the environment.
    ///
    /// A missing token is not an error here: schema and plan requests still
    /// work, and lifecycle operations report the missing token when called.
    pub fn new() -> Result<Self, Error> {
        Self::from_config(&ProviderConfig::from_env())
    }

    /// Create a server from explicit configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, Error> {
        let client = match config.client() {
            Ok(client) => Some(client),
            Err(Error::MissingToken) => {
                tracing::warn!("ASANA_TOKEN is not set; lifecycle operations will fail");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }

    /// Create a server with a custom client (for testing).
    #[cfg(test)]
    pub(crate) fn with_client(client: AsanaClient) -> Self {
        Self {
            client: Some(client),
            tool_router: Self::tool_router(),
        }
    }

    fn client(&self, context: &str) -> Result<&AsanaClient, McpError> {
        self.client
            .as_ref()
            .ok_or_else(|| error_to_mcp(context, Error::MissingToken))
    }

    /// Describe the managed resource types and their field schemas.
    #[tool(description = "Get the provider schema: every managed resource type \
            (asana_project, asana_task) with its fields. Each field lists type, \
            required, computed, force_new (changing it destroys and recreates the \
            resource), default and allowed_values.")]
    async fn provider_schema(
        &self,
        params: Parameters<SchemaParams>,
    ) -> Result<CallToolResult, McpError> {
        let schema = AsanaProvider::schema();

        match params.0.resource_type {
            Some(name) => {
                let kind = parse_kind(&name)?;
                match schema.resource(kind.type_name()) {
                    Some(resource) => json_response(resource),
                    None => Err(error_to_mcp(
                        "Failed to get schema",
                        Error::UnknownResourceType(name),
                    )),
                }
            }
            None => json_response(&schema),
        }
    }

    /// Plan the change from prior state to a proposed configuration.
    #[tool(description = "Plan a change to a resource. Compares prior_state with \
            proposed_state and returns the action (create, update, replace, delete, \
            no_op), the changed fields, and the fields that force replacement. \
            Omit prior_state for a new resource; omit proposed_state to destroy.")]
    async fn resource_plan(
        &self,
        params: Parameters<PlanParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = parse_kind(&p.resource_type)?;

        let plan = AsanaProvider::plan(kind, p.prior_state.as_ref(), p.proposed_state.as_ref())
            .map_err(|e| error_to_mcp(&format!("Failed to plan {}", kind), e))?;
        json_response(&plan)
    }

    /// Create a resource and return its state.
    #[tool(description = "Create a resource from its configuration and return the new \
            state, including the Asana-assigned id.\n\
            - asana_project: name, workspace (required); notes, color, layout \
            (list/board, default board), public (default false)\n\
            - asana_task: name (required); notes; workspace unless projects are given; \
            projects (numeric project ids)")]
    async fn resource_create(
        &self,
        params: Parameters<CreateParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = parse_kind(&p.resource_type)?;
        let context = format!("Failed to create {}", kind);
        let client = self.client(&context)?;

        let state = AsanaProvider::create(client, kind, &p.config)
            .await
            .map_err(|e| error_to_mcp(&context, e))?;
        state_response(Some(state))
    }

    /// Refresh a resource's state from Asana.
    #[tool(description = "Refresh a resource from Asana. Returns the refreshed state, or \
            state null with removed=true when the resource no longer exists. \
            project public and layout are not returned by Asana and are kept as-is.")]
    async fn resource_read(
        &self,
        params: Parameters<ReadParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = parse_kind(&p.resource_type)?;
        let context = format!("Failed to read {}", kind);
        let client = self.client(&context)?;

        let state = AsanaProvider::read(client, kind, &p.state)
            .await
            .map_err(|e| error_to_mcp(&context, e))?;
        state_response(state)
    }

    /// Update a resource in place.
    #[tool(description = "Update a resource in place. Only asana_project supports update \
            (name, notes, color, public); every asana_task field forces replacement. \
            Returns the new state, or state null with removed=true when the resource \
            no longer exists.")]
    async fn resource_update(
        &self,
        params: Parameters<UpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = parse_kind(&p.resource_type)?;
        let context = format!("Failed to update {}", kind);
        let client = self.client(&context)?;

        let state = AsanaProvider::update(client, kind, &p.state, &p.config)
            .await
            .map_err(|e| error_to_mcp(&context, e))?;
        state_response(state)
    }

    /// Delete a resource.
    #[tool(description = "Delete a resource. Deleting a resource that no longer exists \
            succeeds.")]
    async fn resource_delete(
        &self,
        params: Parameters<DeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let kind = parse_kind(&p.resource_type)?;
        let context = format!("Failed to delete {}", kind);
        let client = self.client(&context)?;

        AsanaProvider::delete(client, kind, &p.state)
            .await
            .map_err(|e| error_to_mcp(&context, e))?;
        success_response(&format!("{} deleted", kind))
    }
}

#[tool_handler]
impl ServerHandler for ProviderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "asanaprovider".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Declarative provider for Asana projects (asana_project) and tasks \
                 (asana_task). Call provider_schema first, then drive each resource \
                 through resource_plan and the create/read/update/delete tools. \
                 Authenticate with the ASANA_TOKEN environment variable."
                    .to_string(),
            ),
        }
    }
}
