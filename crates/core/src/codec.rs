//! JSON import/export of journeys and shoot-inspection payloads.
//!
//! Exports are pretty-printed so operators can diff and hand-edit them.
//! Imports are validated in full before anything is returned; callers keep
//! their previous state on error.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::journey::{BlockWithConfig, JourneyDocument};
use crate::shoot_inspect::{self, ShootInspectConfig};
use crate::types::{CompanyId, WorkflowId};

/// Context name used in parse errors for journey files.
const JOURNEY_CONTEXT: &str = "journey import";

/// Serialized journey file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyExport {
    #[serde(default)]
    pub id: Option<WorkflowId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub config: Vec<BlockWithConfig>,
}

fn default_active() -> bool {
    true
}

impl TryFrom<&JourneyDocument> for JourneyExport {
    type Error = CoreError;

    fn try_from(doc: &JourneyDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            description: doc.description.clone(),
            company_id: doc.company_id.clone(),
            is_active: doc.is_active,
            config: doc.to_wire_blocks()?,
        })
    }
}

/// Serialize a journey with inlined payloads as pretty JSON.
pub fn export_journey(doc: &JourneyDocument) -> Result<String, CoreError> {
    serde_json::to_string_pretty(&JourneyExport::try_from(doc)?)
        .map_err(|e| CoreError::parse("journey export", &e))
}

/// Parse a journey file and rebuild the document it describes.
pub fn import_journey(text: &str) -> Result<JourneyDocument, CoreError> {
    let export: JourneyExport =
        serde_json::from_str(text).map_err(|e| CoreError::parse(JOURNEY_CONTEXT, &e))?;

    let doc = JourneyDocument::from_wire(
        export.id,
        export.name,
        Some(export.description),
        export.company_id,
        export.is_active,
        export.config,
    )?;
    doc.check_integrity()?;

    tracing::debug!(
        journey = %doc.name,
        block_count = doc.blocks().len(),
        "Imported journey"
    );
    Ok(doc)
}

/// Serialize one shoot-inspection payload as pretty JSON.
pub fn export_shoot_inspect(config: &ShootInspectConfig) -> Result<String, CoreError> {
    serde_json::to_string_pretty(config).map_err(|e| CoreError::parse("shootInspect export", &e))
}

/// Parse and validate a shoot-inspection payload.
pub fn import_shoot_inspect(text: &str) -> Result<ShootInspectConfig, CoreError> {
    shoot_inspect::parse_config(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
