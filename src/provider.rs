//! Provider registration and lifecycle dispatch.
//!
//! The host addresses resources by type name and exchanges state as JSON
//! objects. [`AsanaProvider`] validates and defaults configuration against the
//! resource schema, converts it into the typed field struct, runs the typed
//! handler and converts the result back.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::client::AsanaClient;
use crate::resources::{ProjectResource, Resource, ResourceData, TaskResource, Updatable};
use crate::schema::{PlanResult, ProviderSchema, ID_FIELD};
use crate::Error;

/// The resource kinds this provider manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Task,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Project, ResourceKind::Task];

    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::Project => ProjectResource::TYPE_NAME,
            ResourceKind::Task => TaskResource::TYPE_NAME,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| Error::UnknownResourceType(s.to_string()))
    }
}

/// The Asana provider: a fixed registry of resource kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsanaProvider;

impl AsanaProvider {
    /// Type names of every managed resource.
    pub fn resource_types() -> [&'static str; 2] {
        ResourceKind::ALL.map(ResourceKind::type_name)
    }

    /// Schemas of every managed resource.
    pub fn schema() -> ProviderSchema {
        ProviderSchema::default()
            .with_resource(ProjectResource::schema())
            .with_resource(TaskResource::schema())
    }

    /// Classify the change from `prior` state to a `proposed` configuration.
    ///
    /// The proposal goes through the same checks as [`AsanaProvider::create`],
    /// so a plan never promises a change that would later be rejected.
    pub fn plan(
        kind: ResourceKind,
        prior: Option<&Value>,
        proposed: Option<&Value>,
    ) -> Result<PlanResult, Error> {
        match kind {
            ResourceKind::Project => plan::<ProjectResource>(prior, proposed),
            ResourceKind::Task => plan::<TaskResource>(prior, proposed),
        }
    }

    /// Create a resource from configuration, returning its new state.
    pub async fn create(
        client: &AsanaClient,
        kind: ResourceKind,
        config: &Value,
    ) -> Result<Value, Error> {
        match kind {
            ResourceKind::Project => create::<ProjectResource>(client, config).await,
            ResourceKind::Task => create::<TaskResource>(client, config).await,
        }
    }

    /// Refresh state from the API. `None` means the resource is gone.
    pub async fn read(
        client: &AsanaClient,
        kind: ResourceKind,
        state: &Value,
    ) -> Result<Option<Value>, Error> {
        match kind {
            ResourceKind::Project => read::<ProjectResource>(client, state).await,
            ResourceKind::Task => read::<TaskResource>(client, state).await,
        }
    }

    /// Apply configuration to an existing resource. `None` means the resource is gone.
    ///
    /// # Errors
    ///
    /// Tasks have no in-place update and always yield [`Error::UpdateNotSupported`].
    pub async fn update(
        client: &AsanaClient,
        kind: ResourceKind,
        state: &Value,
        config: &Value,
    ) -> Result<Option<Value>, Error> {
        match kind {
            ResourceKind::Project => update::<ProjectResource>(client, state, config).await,
            ResourceKind::Task => Err(Error::UpdateNotSupported(kind.to_string())),
        }
    }

    /// Delete a resource. Deleting one that is already gone succeeds.
    pub async fn delete(
        client: &AsanaClient,
        kind: ResourceKind,
        state: &Value,
    ) -> Result<(), Error> {
        match kind {
            ResourceKind::Project => delete::<ProjectResource>(client, state).await,
            ResourceKind::Task => delete::<TaskResource>(client, state).await,
        }
    }
}

fn as_object<'a>(type_name: &str, value: &'a Value) -> Result<&'a Map<String, Value>, Error> {
    value.as_object().ok_or_else(|| Error::InvalidConfig {
        resource_type: type_name.to_string(),
        problems: vec!["expected a JSON object".to_string()],
    })
}

/// Validate, default and type a configuration object.
fn prepare<R: Resource>(config: &Value) -> Result<R::Fields, Error> {
    let config = as_object(R::TYPE_NAME, config)?;

    let schema = R::schema();
    schema.validate(config)?;

    let mut config = config.clone();
    config.remove(ID_FIELD);
    schema.apply_defaults(&mut config);

    let fields: R::Fields = serde_json::from_value(Value::Object(config))?;
    R::validate(&fields)?;
    Ok(fields)
}

fn plan<R: Resource>(prior: Option<&Value>, proposed: Option<&Value>) -> Result<PlanResult, Error> {
    let prior = prior.map(|v| as_object(R::TYPE_NAME, v)).transpose()?;
    let proposed = match proposed {
        Some(value) => {
            prepare::<R>(value)?;
            Some(as_object(R::TYPE_NAME, value)?)
        }
        None => None,
    };

    Ok(R::schema().plan(prior, proposed))
}

fn load_state<R: Resource>(state: &Value) -> Result<ResourceData<R::Fields>, Error> {
    Ok(serde_json::from_value(state.clone())?)
}

fn present<F: serde::Serialize>(data: &ResourceData<F>) -> Result<Option<Value>, Error> {
    if data.is_absent() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_value(data)?))
    }
}

async fn create<R: Resource>(client: &AsanaClient, config: &Value) -> Result<Value, Error> {
    let mut data = ResourceData::new(prepare::<R>(config)?);
    R::create(client, &mut data).await?;
    Ok(serde_json::to_value(&data)?)
}

async fn read<R: Resource>(client: &AsanaClient, state: &Value) -> Result<Option<Value>, Error> {
    let mut data = load_state::<R>(state)?;
    R::read(client, &mut data).await?;
    present(&data)
}

async fn update<R: Updatable>(
    client: &AsanaClient,
    state: &Value,
    config: &Value,
) -> Result<Option<Value>, Error> {
    let prior = load_state::<R>(state)?;
    let id = prior.require_id(R::TYPE_NAME)?;

    let mut data = ResourceData::new(prepare::<R>(config)?).with_id(id);
    R::update(client, &mut data).await?;
    present(&data)
}

async fn delete<R: Resource>(client: &AsanaClient, state: &Value) -> Result<(), Error> {
    let mut data = load_state::<R>(state)?;
    R::delete(client, &mut data).await
}
