//! Block configuration payloads and the per-type resolver.
//!
//! Three payload shapes exist: the typed shoot-inspection step list and the
//! free-form JSON objects behind `form` and `static` blocks. `fastTrack` and
//! `addDamage` blocks carry no payload.
//!
//! Form and static payloads are accepted either as a bare object or as an
//! array whose first element is the object, so text pasted from either
//! authoring convention resolves without manual unwrapping.

use serde_json::{Map, Value};

use crate::block::BlockType;
use crate::error::CoreError;
use crate::shoot_inspect::{self, ShootInspectConfig};

// ---------------------------------------------------------------------------
// JsonConfig
// ---------------------------------------------------------------------------

/// A resolved form or static payload: a JSON object guaranteed to carry an
/// `id`. All other fields are opaque and passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonConfig(Map<String, Value>);

impl JsonConfig {
    /// The payload id as a string. Non-string ids use their JSON text.
    pub fn id(&self) -> String {
        match &self.0["id"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// `name`, when present as a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// `description`, when present as a string.
    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert("id".to_string(), Value::String(id.into()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Seed payload for a newly added block.
    pub fn seed(id: &str, name: &str) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(id.to_string()));
        map.insert("name".to_string(), Value::String(name.to_string()));
        Self(map)
    }
}

// ---------------------------------------------------------------------------
// BlockConfig
// ---------------------------------------------------------------------------

/// Configuration payload of one block, tagged by block type.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockConfig {
    ShootInspect(ShootInspectConfig),
    Form(JsonConfig),
    Static(JsonConfig),
}

impl BlockConfig {
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::ShootInspect(_) => BlockType::ShootInspect,
            Self::Form(_) => BlockType::Form,
            Self::Static(_) => BlockType::Static,
        }
    }

    /// Identifier of the config object.
    pub fn config_id(&self) -> String {
        match self {
            Self::ShootInspect(c) => c.id.clone(),
            Self::Form(c) | Self::Static(c) => c.id(),
        }
    }

    /// Re-key the config object, e.g. to an id assigned upstream.
    pub fn set_config_id(&mut self, config_id: impl Into<String>) {
        match self {
            Self::ShootInspect(c) => c.id = config_id.into(),
            Self::Form(c) | Self::Static(c) => c.set_id(config_id),
        }
    }

    /// Display name the owning block should show, if the payload defines one.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::ShootInspect(c) => Some(c.name.as_str()),
            Self::Form(c) | Self::Static(c) => c.name(),
        }
    }

    /// Description the owning block should show, if the payload defines one.
    pub fn display_description(&self) -> Option<&str> {
        match self {
            Self::ShootInspect(c) => c.description.as_deref(),
            Self::Form(c) | Self::Static(c) => c.description(),
        }
    }

    /// Re-check the structural rules for this payload's type.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::ShootInspect(c) => c.validate(),
            Self::Form(_) | Self::Static(_) => Ok(()),
        }
    }

    /// The payload as it travels in `configData`.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        match self {
            Self::ShootInspect(c) => serde_json::to_value(c)
                .map_err(|e| CoreError::parse(format!("{} block", BlockType::ShootInspect), &e)),
            Self::Form(c) | Self::Static(c) => Ok(Value::Object(c.0.clone())),
        }
    }

    /// Rebuild a payload from its `configData` value.
    pub fn from_value(block_type: BlockType, value: Value) -> Result<Self, CoreError> {
        match block_type {
            BlockType::ShootInspect => {
                let config: ShootInspectConfig = serde_json::from_value(value)
                    .map_err(|e| CoreError::parse(format!("{block_type} block"), &e))?;
                config.validate()?;
                Ok(Self::ShootInspect(config))
            }
            BlockType::Form => resolve_json_value(block_type, value).map(Self::Form),
            BlockType::Static => resolve_json_value(block_type, value).map(Self::Static),
            BlockType::FastTrack | BlockType::AddDamage => Err(no_payload(block_type)),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Parse and validate the raw payload text for a block of `block_type`.
///
/// Pure: the caller decides where the result is stored.
pub fn resolve(block_type: BlockType, raw: &str) -> Result<BlockConfig, CoreError> {
    match block_type {
        BlockType::ShootInspect => shoot_inspect::parse_config(raw).map(BlockConfig::ShootInspect),
        BlockType::Form | BlockType::Static => {
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| CoreError::parse(format!("{block_type} block"), &e))?;
            BlockConfig::from_value(block_type, value)
        }
        BlockType::FastTrack | BlockType::AddDamage => Err(no_payload(block_type)),
    }
}

/// Normalize a parsed form/static payload.
///
/// - arrays resolve to their first element ([`CoreError::EmptyArray`] when
///   empty)
/// - the resolved value must be an object
/// - the object must contain a non-null `id` ([`CoreError::MissingId`])
fn resolve_json_value(block_type: BlockType, value: Value) -> Result<JsonConfig, CoreError> {
    let resolved = match value {
        Value::Array(items) => items.into_iter().next().ok_or(CoreError::EmptyArray)?,
        other => other,
    };

    let Value::Object(map) = resolved else {
        return Err(CoreError::Validation(format!(
            "{block_type} configuration must be a JSON object or a non-empty array of objects"
        )));
    };

    if map.get("id").map_or(true, Value::is_null) {
        return Err(CoreError::MissingId);
    }

    Ok(JsonConfig(map))
}

fn no_payload(block_type: BlockType) -> CoreError {
    CoreError::Validation(format!("{block_type} blocks carry no configuration payload"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
