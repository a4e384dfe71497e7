//! Asana Provider Library
//!
//! A declarative infrastructure provider that manages Asana projects
//! (`asana_project`) and tasks (`asana_task`) as resources. Each resource
//! kind maps a typed field set onto Asana REST calls and maps responses back
//! into provider state. A 404 from Asana means the resource is gone: reads
//! and updates clear the resource's identifier, deletes succeed.
//!
//! The provider can be embedded as a library or served to a host over MCP
//! on stdio by the `asanaprovider` binary.
//!
//! # Example
//!
//! ```rust,no_run
//! use asanaprovider::{AsanaProvider, ProviderConfig, ResourceKind};
//!
//! # async fn example() -> Result<(), asanaprovider::Error> {
//! let client = ProviderConfig::from_env().client()?;
//!
//! let config = serde_json::json!({
//!     "name": "Launch Plan",
//!     "workspace": "12345",
//!     "color": "dark-blue"
//! });
//! let state = AsanaProvider::create(&client, ResourceKind::Project, &config).await?;
//!
//! // `None` means the project was deleted outside the provider
//! let _refreshed = AsanaProvider::read(&client, ResourceKind::Project, &state).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod types;

// Re-export main types at crate root
pub use client::AsanaClient;
pub use config::ProviderConfig;
pub use error::Error;
pub use provider::{AsanaProvider, ResourceKind};
pub use server::ProviderServer;

// Re-export commonly used types
pub use resources::{
    Layout, ProjectColor, ProjectFields, ProjectResource, Resource, ResourceData, TaskFields,
    TaskResource, Updatable,
};
pub use schema::{FieldSchema, FieldType, PlanAction, PlanResult, ProviderSchema, ResourceSchema};
