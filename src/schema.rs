//! Field schemas for managed resources.
//!
//! A [`ResourceSchema`] declares each field's type, required-ness, default,
//! allowed values and whether a change forces replacement. The schema drives
//! configuration validation, default filling and change planning; the typed
//! handlers in [`crate::resources`] never see a configuration that failed it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Error;

/// Name of the identifier slot present in every resource state.
pub const ID_FIELD: &str = "id";

/// The value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    StringList,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Bool => value.is_boolean(),
            FieldType::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Bool => "a boolean",
            FieldType::StringList => "a list of strings",
        }
    }
}

/// Declaration of a single resource field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    /// Filled in from the API when the configuration omits it.
    pub computed: bool,
    /// Changing this field destroys and recreates the resource.
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<&'static [&'static str]>,
    pub description: &'static str,
}

impl FieldSchema {
    /// A required string field.
    pub fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
            required: true,
            computed: false,
            force_new: false,
            default: None,
            allowed_values: None,
            description,
        }
    }

    /// An optional field of the given type.
    pub fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            required: false,
            field_type,
            ..Self::required_string(name, description)
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(values);
        self
    }
}

/// Schema of one resource type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub fields: Vec<FieldSchema>,
}

/// What applying a proposed configuration would do to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    Replace,
    Delete,
    NoOp,
}

/// Result of planning a change against prior state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub action: PlanAction,
    /// Fields whose value would change.
    pub changed: Vec<String>,
    /// The subset of `changed` that forces replacement.
    pub requires_replace: Vec<String>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self { type_name, fields }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check a configuration object against the schema.
    ///
    /// Every problem is collected so that the caller sees them all at once.
    /// `null` counts as absent. The `id` slot is always accepted.
    pub fn validate(&self, config: &Map<String, Value>) -> Result<(), Error> {
        let mut problems = Vec::new();

        for field in &self.fields {
            match config.get(field.name).filter(|v| !v.is_null()) {
                None if field.required => problems.push(format!("{} is required", field.name)),
                None => {}
                Some(value) if !field.field_type.matches(value) => problems.push(format!(
                    "{} must be {}",
                    field.name,
                    field.field_type.describe()
                )),
                Some(value) => {
                    if let (Some(allowed), Some(s)) = (field.allowed_values, value.as_str()) {
                        if !allowed.contains(&s) {
                            problems.push(format!(
                                "{} must be one of: {}",
                                field.name,
                                allowed.join(", ")
                            ));
                        }
                    }
                }
            }
        }

        for key in config.keys() {
            if key != ID_FIELD && self.field(key).is_none() {
                problems.push(format!("{} is not a known field", key));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConfig {
                resource_type: self.type_name.to_string(),
                problems,
            })
        }
    }

    /// Fill declared defaults into absent (or `null`) fields.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for field in &self.fields {
            let Some(default) = &field.default else {
                continue;
            };
            let absent = config.get(field.name).map_or(true, Value::is_null);
            if absent {
                config.insert(field.name.to_string(), default.clone());
            }
        }
    }

    /// Classify the change from `prior` state to a `proposed` configuration.
    ///
    /// `None` on either side means the resource is absent there. Defaults are
    /// applied to both sides before comparing, so a defaulted field that either
    /// side leaves out is not a change. A computed field left out of
    /// the proposal keeps its prior value and is never a change.
    pub fn plan(
        &self,
        prior: Option<&Map<String, Value>>,
        proposed: Option<&Map<String, Value>>,
    ) -> PlanResult {
        let (prior, proposed) = match (prior, proposed) {
            (None, None) => return PlanResult::new(PlanAction::NoOp),
            (None, Some(_)) => return PlanResult::new(PlanAction::Create),
            (Some(_), None) => return PlanResult::new(PlanAction::Delete),
            (Some(prior), Some(proposed)) => (prior, proposed),
        };

        // State whose id was cleared by a read no longer exists remotely.
        let gone = prior
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map_or(true, str::is_empty);
        if gone {
            return PlanResult::new(PlanAction::Create);
        }

        let mut prior = prior.clone();
        self.apply_defaults(&mut prior);
        let mut proposed = proposed.clone();
        self.apply_defaults(&mut proposed);

        let mut changed = Vec::new();
        let mut requires_replace = Vec::new();

        for field in &self.fields {
            let new = normalize(proposed.get(field.name));
            if new.is_none() && field.computed {
                continue;
            }
            if new != normalize(prior.get(field.name)) {
                changed.push(field.name.to_string());
                if field.force_new {
                    requires_replace.push(field.name.to_string());
                }
            }
        }

        let action = if !requires_replace.is_empty() {
            PlanAction::Replace
        } else if !changed.is_empty() {
            PlanAction::Update
        } else {
            PlanAction::NoOp
        };

        PlanResult {
            action,
            changed,
            requires_replace,
        }
    }
}

impl PlanResult {
    fn new(action: PlanAction) -> Self {
        Self {
            action,
            changed: Vec::new(),
            requires_replace: Vec::new(),
        }
    }
}

/// Treat `null`, `""` and `[]` as absent so that omitted optionals compare
/// equal to what a read stores for them.
fn normalize(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    })
}

/// Schemas of every resource type a provider manages, keyed by type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub resources: BTreeMap<&'static str, ResourceSchema>,
}

impl ProviderSchema {
    pub fn with_resource(mut self, schema: ResourceSchema) -> Self {
        self.resources.insert(schema.type_name, schema);
        self
    }

    pub fn resource(&self, type_name: &str) -> Option<&ResourceSchema> {
        self.resources.get(type_name)
    }
}
