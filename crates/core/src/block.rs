//! Journey block types and the block record.
//!
//! A block is one ordered step of an inspection journey. Its type is fixed
//! at creation; display metadata for `form` and `static` blocks is derived
//! from the attached configuration payload.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// BlockType
// ---------------------------------------------------------------------------

/// The kind of step a block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Form,
    ShootInspect,
    FastTrack,
    AddDamage,
    Static,
}

impl BlockType {
    /// All block types, in the order the block palette lists them.
    pub const ALL: [BlockType; 5] = [
        Self::Form,
        Self::ShootInspect,
        Self::FastTrack,
        Self::AddDamage,
        Self::Static,
    ];

    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::ShootInspect => "shootInspect",
            Self::FastTrack => "fastTrack",
            Self::AddDamage => "addDamage",
            Self::Static => "static",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "form" => Ok(Self::Form),
            "shootInspect" => Ok(Self::ShootInspect),
            "fastTrack" => Ok(Self::FastTrack),
            "addDamage" => Ok(Self::AddDamage),
            "static" => Ok(Self::Static),
            _ => Err(CoreError::Validation(format!(
                "Invalid block type: '{s}'. Must be one of: form, shootInspect, \
                 fastTrack, addDamage, static"
            ))),
        }
    }

    /// Hyphenated form used when building semantic identifiers.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::ShootInspect => "shoot-inspect",
            Self::FastTrack => "fast-track",
            Self::AddDamage => "add-damage",
            Self::Static => "static",
        }
    }

    /// Whether blocks of this type carry a configuration payload.
    ///
    /// `fastTrack` and `addDamage` are self-contained.
    pub fn carries_payload(&self) -> bool {
        matches!(self, Self::Form | Self::ShootInspect | Self::Static)
    }

    /// Display name given to a freshly added block.
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::ShootInspect => "Shoot inspection",
            Self::FastTrack => "Fast track",
            Self::AddDamage => "Add damage",
            Self::Static => "Static screen",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One step of a journey.
///
/// The configuration payload is not embedded here; it lives in the owning
/// document's side-table keyed by [`Block::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    block_type: BlockType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    pub order: u32,
}

impl Block {
    /// Create a block with order 0; the list assigns the real position on
    /// insertion.
    pub fn new(
        id: impl Into<String>,
        block_type: BlockType,
        name: impl Into<String>,
        config_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            block_type,
            name: name.into(),
            description: None,
            config_id,
            order: 0,
        }
    }

    /// The block type, fixed at creation.
    pub fn block_type(&self) -> BlockType {
        self.block_type
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
