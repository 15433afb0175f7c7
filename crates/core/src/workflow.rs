//! Request and record shapes of the workflow persistence API.
//!
//! A persisted journey is called a workflow upstream. Blocks always travel
//! with their payload inlined as `configData`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::journey::{BlockWithConfig, JourneyDocument};
use crate::types::{CompanyId, Timestamp, WorkflowId};

/// Body of `POST /workflows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    pub company_id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub blocks: Vec<BlockWithConfig>,
}

/// Body of `PUT /workflows/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockWithConfig>>,
}

/// Body of `POST /workflows/{id}/duplicate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateWorkflowRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
}

/// A workflow as returned by the persistence API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub id: WorkflowId,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub blocks: Vec<BlockWithConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

fn default_active() -> bool {
    true
}

impl JourneyDocument {
    /// Request creating this journey upstream.
    ///
    /// Requires a company; run [`JourneyDocument::validate_for_save`] first.
    pub fn to_create_request(&self) -> Result<CreateWorkflowRequest, CoreError> {
        let company_id = self
            .company_id
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CoreError::Validation("Select a company for this journey".to_string()))?;
        Ok(CreateWorkflowRequest {
            company_id,
            name: self.name.trim().to_string(),
            description: self.description_opt(),
            is_active: self.is_active,
            blocks: self.to_wire_blocks()?,
        })
    }

    /// Full-replacement update request for an already persisted journey.
    pub fn to_update_request(&self) -> Result<UpdateWorkflowRequest, CoreError> {
        Ok(UpdateWorkflowRequest {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.clone()),
            is_active: Some(self.is_active),
            blocks: Some(self.to_wire_blocks()?),
        })
    }

    /// Rebuild a document from a persisted workflow.
    pub fn from_record(record: WorkflowRecord) -> Result<Self, CoreError> {
        let doc = Self::from_wire(
            Some(record.id),
            record.name,
            record.description,
            record.company_id,
            record.is_active,
            record.blocks,
        )?;
        doc.check_integrity()?;
        Ok(doc)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::block::BlockType;

    fn doc() -> JourneyDocument {
        let mut doc = JourneyDocument::new(" Std Inspection ", Some("acme".to_string()));
        doc.add_block(BlockType::Form).unwrap();
        doc.add_block(BlockType::FastTrack).unwrap();
        doc
    }

    #[test]
    fn create_request_trims_name_and_omits_blank_description() {
        let request = doc().to_create_request().unwrap();
        assert_eq!(request.name, "Std Inspection");
        assert_eq!(request.description, None);
        assert_eq!(request.company_id, "acme");
        assert_eq!(request.blocks.len(), 2);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["companyId"], "acme");
        assert_eq!(json["isActive"], true);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn create_request_requires_company() {
        let mut doc = doc();
        doc.company_id = None;
        assert_matches!(doc.to_create_request(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_request_carries_every_field() {
        let request = doc().to_update_request().unwrap();
        assert_eq!(request.name.as_deref(), Some("Std Inspection"));
        assert_eq!(request.is_active, Some(true));
        assert_eq!(request.blocks.map(|b| b.len()), Some(2));
    }

    #[test]
    fn record_round_trips_into_document() {
        let original = doc();
        let record = WorkflowRecord {
            id: "wf-1".to_string(),
            company_id: original.company_id.clone(),
            name: original.name.clone(),
            description: None,
            is_active: true,
            blocks: original.to_wire_blocks().unwrap(),
            created_at: None,
            updated_at: None,
        };
        let loaded = JourneyDocument::from_record(record).unwrap();
        assert_eq!(loaded.id.as_deref(), Some("wf-1"));
        assert_eq!(loaded.blocks(), original.blocks());
        assert_eq!(loaded.config("form-step-1"), original.config("form-step-1"));
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let record: WorkflowRecord = serde_json::from_value(json!({
            "id": "wf-2",
            "name": "Quick check",
            "blocks": [
                { "id": "fast-track-step-1", "type": "fastTrack", "name": "Fast", "order": 1 }
            ]
        }))
        .unwrap();
        assert!(record.is_active);
        let doc = JourneyDocument::from_record(record).unwrap();
        assert_eq!(doc.blocks().len(), 1);
    }
}
