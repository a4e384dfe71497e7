//! Managed resource kinds and their lifecycle handlers.
//!
//! Each resource kind pairs a typed field struct with create/read/delete
//! handlers, plus update where the remote API allows it. Handlers receive
//! the API client explicitly and operate on a [`ResourceData`]: the typed
//! fields and the identifier slot. An empty identifier means the resource is
//! absent; read, update and delete clear it when the API answers 404.

pub mod project;
pub mod task;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::AsanaClient;
use crate::schema::ResourceSchema;
use crate::Error;

pub use project::{Layout, ProjectColor, ProjectFields, ProjectResource, PROJECT_COLORS};
pub use task::{TaskFields, TaskResource};

/// Per-instance state: the remote identifier plus the typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData<F> {
    #[serde(default)]
    id: String,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> ResourceData<F> {
    /// State for a resource that does not exist remotely yet.
    pub fn new(fields: F) -> Self {
        Self {
            id: String::new(),
            fields,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }

    /// The identifier, or [`Error::MissingId`] for absent state.
    pub fn require_id(&self, type_name: &str) -> Result<&str, Error> {
        if self.is_absent() {
            Err(Error::MissingId(type_name.to_string()))
        } else {
            Ok(&self.id)
        }
    }
}

/// Lifecycle contract of a managed resource kind.
///
/// Implementations may write the handlers as `async fn`; the returned
/// futures must be `Send` so hosts can drive them on a multi-threaded runtime.
pub trait Resource {
    /// Type name the host addresses this kind by.
    const TYPE_NAME: &'static str;

    type Fields: Serialize + DeserializeOwned + Clone + Send + Sync;

    fn schema() -> ResourceSchema;

    /// Checks spanning several fields, run after schema validation.
    fn validate(_fields: &Self::Fields) -> Result<(), Error> {
        Ok(())
    }

    /// Create the remote object and record its identifier.
    fn create(
        client: &AsanaClient,
        data: &mut ResourceData<Self::Fields>,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Refresh fields from the remote object, clearing the identifier if it is gone.
    fn read(
        client: &AsanaClient,
        data: &mut ResourceData<Self::Fields>,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete the remote object. Deleting an object that is already gone succeeds.
    fn delete(
        client: &AsanaClient,
        data: &mut ResourceData<Self::Fields>,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Resource kinds whose remote objects can be changed in place.
pub trait Updatable: Resource {
    fn update(
        client: &AsanaClient,
        data: &mut ResourceData<Self::Fields>,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Turn a 404 into "gone": clear the identifier and yield `None`.
pub(crate) fn unless_gone<T, F>(
    result: Result<T, Error>,
    data: &mut ResourceData<F>,
    type_name: &str,
) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(
                resource_type = type_name,
                id = %data.id(),
                "remote object no longer exists; removing from state"
            );
            data.clear_id();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Store empty strings returned by the API as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
