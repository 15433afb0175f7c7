//! Journey documents: metadata, the ordered block list and the config
//! side-table.
//!
//! Payloads live in a map keyed by the stable block id so reordering only
//! renumbers the block list. At the persistence boundary the two tables are
//! flattened into one array of blocks carrying `configData`, and split apart
//! again on load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockType};
use crate::block_config::{self, BlockConfig, JsonConfig};
use crate::block_list::OrderedBlockList;
use crate::error::CoreError;
use crate::identifiers::{self, Identifiers};
use crate::shoot_inspect::ShootInspectConfig;
use crate::types::{CompanyId, WorkflowId};

// ---------------------------------------------------------------------------
// Wire representation
// ---------------------------------------------------------------------------

/// A block with its payload inlined as `configData`, as exchanged with the
/// workflow API and in exported journey files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockWithConfig {
    #[serde(flatten)]
    pub block: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_data: Option<Value>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a journey name: non-empty after trimming.
pub fn validate_journey_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Journey name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Config id a returned block carries: its `configId`, or the `id` of its
/// inlined payload.
fn remote_config_id(remote: &BlockWithConfig) -> Option<&str> {
    remote.block.config_id.as_deref().or_else(|| {
        remote
            .config_data
            .as_ref()
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
    })
}

// ---------------------------------------------------------------------------
// JourneyDocument
// ---------------------------------------------------------------------------

/// One journey being authored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyDocument {
    /// Upstream workflow id; `None` until the first successful save.
    pub id: Option<WorkflowId>,
    pub name: String,
    pub description: String,
    pub company_id: Option<CompanyId>,
    pub is_active: bool,
    blocks: OrderedBlockList,
    configs: HashMap<String, BlockConfig>,
}

impl JourneyDocument {
    /// An empty, active journey.
    pub fn new(name: impl Into<String>, company_id: Option<CompanyId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            company_id,
            is_active: true,
            blocks: OrderedBlockList::new(),
            configs: HashMap::new(),
        }
    }

    /// Rebuild a document from blocks carrying inlined `configData`.
    ///
    /// Payloads are split back into the side-table. Payload-carrying blocks
    /// without `configData` are rejected; `configData` on payload-free blocks
    /// is dropped.
    pub fn from_wire(
        id: Option<WorkflowId>,
        name: impl Into<String>,
        description: Option<String>,
        company_id: Option<CompanyId>,
        is_active: bool,
        blocks: Vec<BlockWithConfig>,
    ) -> Result<Self, CoreError> {
        let mut doc = Self {
            id,
            name: name.into(),
            description: description.unwrap_or_default(),
            company_id,
            is_active,
            blocks: OrderedBlockList::new(),
            configs: HashMap::new(),
        };

        let mut sorted = blocks;
        sorted.sort_by_key(|b| b.block.order);

        for BlockWithConfig { block, config_data } in sorted {
            let block_type = block.block_type();
            let config = match (block_type.carries_payload(), config_data) {
                (true, Some(value)) => Some(BlockConfig::from_value(block_type, value)?),
                (true, None) => {
                    return Err(CoreError::Validation(format!(
                        "Block '{}' of type {block_type} is missing its configData",
                        block.id
                    )));
                }
                (false, Some(_)) => {
                    tracing::warn!(
                        block_id = %block.id,
                        block_type = %block_type,
                        "Ignoring configData on a payload-free block"
                    );
                    None
                }
                (false, None) => None,
            };
            doc.push_block(block, config)?;
        }

        Ok(doc)
    }

    // -- read access ----------------------------------------------------------

    pub fn blocks(&self) -> &OrderedBlockList {
        &self.blocks
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.get(block_id)
    }

    /// Payload attached to a block, if any.
    pub fn config(&self, block_id: &str) -> Option<&BlockConfig> {
        self.configs.get(block_id)
    }

    pub fn shoot_inspect_config(&self, block_id: &str) -> Option<&ShootInspectConfig> {
        match self.configs.get(block_id) {
            Some(BlockConfig::ShootInspect(config)) => Some(config),
            _ => None,
        }
    }

    // -- metadata -------------------------------------------------------------

    /// Set the journey name. Blank names are accepted while editing and
    /// rejected by the save gate.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Attach the journey to a company; blank ids clear the selection.
    pub fn set_company(&mut self, company_id: Option<CompanyId>) {
        self.company_id = company_id.filter(|c| !c.trim().is_empty());
    }

    // -- identifiers ----------------------------------------------------------

    /// Identifiers for the next block of `block_type`, guaranteed not to be
    /// in use by any block or config object of this document.
    pub fn allocate_identifiers(&self, block_type: BlockType) -> Identifiers {
        let existing = self.blocks.count_of(block_type);
        identifiers::allocate_free(block_type, existing, |id| {
            self.blocks.contains(id) || self.config_id_in_use(id)
        })
    }

    fn config_id_in_use(&self, config_id: &str) -> bool {
        self.blocks
            .iter()
            .any(|b| b.config_id.as_deref() == Some(config_id))
    }

    // -- block editing --------------------------------------------------------

    /// Append a new block of `block_type` with freshly allocated ids.
    ///
    /// Payload-carrying types start with a seed payload so the document
    /// never holds a block whose config is missing.
    pub fn add_block(&mut self, block_type: BlockType) -> Result<&Block, CoreError> {
        let Identifiers {
            block_id,
            config_id,
        } = self.allocate_identifiers(block_type);
        let name = block_type.default_name();

        let config = config_id.as_deref().map(|cid| match block_type {
            BlockType::ShootInspect => BlockConfig::ShootInspect(ShootInspectConfig::new(cid, name)),
            BlockType::Form => BlockConfig::Form(JsonConfig::seed(cid, name)),
            _ => BlockConfig::Static(JsonConfig::seed(cid, name)),
        });

        let block = Block::new(block_id.clone(), block_type, name, config_id);
        self.push_block(block, config)?;
        self.blocks
            .get(&block_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Block",
                id: block_id,
            })
    }

    /// Remove a block together with its payload.
    pub fn remove_block(&mut self, block_id: &str) -> Result<Block, CoreError> {
        let removed = self.blocks.remove(block_id)?;
        self.configs.remove(block_id);
        Ok(removed)
    }

    /// Move the block at position `from` to position `to` (0-based).
    pub fn reorder_blocks(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.blocks.reorder(from, to)
    }

    /// Rename a block whose display metadata is not derived from a payload.
    ///
    /// Renaming a shoot-inspection block renames its payload as well.
    pub fn rename_block(
        &mut self,
        block_id: &str,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), CoreError> {
        let block = self.blocks.get_mut(block_id).ok_or_else(|| CoreError::NotFound {
            entity: "Block",
            id: block_id.to_string(),
        })?;
        let block_type = block.block_type();
        if matches!(block_type, BlockType::Form | BlockType::Static) {
            return Err(CoreError::Validation(format!(
                "{block_type} blocks take their name and description from their configuration"
            )));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Block name must not be empty".to_string(),
            ));
        }
        block.name = name.clone();
        block.description = description.clone();
        if let Some(BlockConfig::ShootInspect(config)) = self.configs.get_mut(block_id) {
            config.name = name;
            config.description = description;
        }
        Ok(())
    }

    /// Replace a block's payload from raw JSON text.
    ///
    /// On any error the document is left unchanged.
    pub fn set_block_config(&mut self, block_id: &str, raw: &str) -> Result<(), CoreError> {
        let block_type = self.require_block(block_id)?.block_type();
        let config = block_config::resolve(block_type, raw)?;
        self.attach_config(block_id, config)
    }

    /// Replace a shoot-inspection block's step list.
    ///
    /// The payload id is pinned to the block's `configId`.
    pub fn set_shoot_inspect_config(
        &mut self,
        block_id: &str,
        mut config: ShootInspectConfig,
    ) -> Result<(), CoreError> {
        let block = self.require_block(block_id)?;
        if block.block_type() != BlockType::ShootInspect {
            return Err(CoreError::Validation(format!(
                "Block '{block_id}' is a {} block, not shootInspect",
                block.block_type()
            )));
        }
        if let Some(config_id) = &block.config_id {
            config.id = config_id.clone();
        }
        config.validate()?;
        self.attach_config(block_id, BlockConfig::ShootInspect(config))
    }

    fn require_block(&self, block_id: &str) -> Result<&Block, CoreError> {
        self.blocks.get(block_id).ok_or_else(|| CoreError::NotFound {
            entity: "Block",
            id: block_id.to_string(),
        })
    }

    /// Store a resolved payload and refresh the block fields derived from it.
    fn attach_config(&mut self, block_id: &str, config: BlockConfig) -> Result<(), CoreError> {
        let config_id = config.config_id();
        let clash = self
            .blocks
            .iter()
            .any(|b| b.id != block_id && b.config_id.as_deref() == Some(config_id.as_str()));
        if clash {
            return Err(CoreError::Validation(format!(
                "Config id '{config_id}' is already used by another block"
            )));
        }

        let block = self.blocks.get_mut(block_id).ok_or_else(|| CoreError::NotFound {
            entity: "Block",
            id: block_id.to_string(),
        })?;
        if block.block_type() != config.block_type() {
            return Err(CoreError::Validation(format!(
                "Cannot attach a {} payload to a {} block",
                config.block_type(),
                block.block_type()
            )));
        }

        block.config_id = Some(config_id);
        if let Some(name) = config.display_name().filter(|n| !n.trim().is_empty()) {
            block.name = name.to_string();
        }
        match (&config, config.display_description()) {
            (_, Some(description)) => block.description = Some(description.to_string()),
            (BlockConfig::ShootInspect(_), None) => block.description = None,
            _ => {}
        }

        self.configs.insert(block_id.to_string(), config);
        Ok(())
    }

    /// Append a block with its payload, enforcing the side-table invariants.
    pub(crate) fn push_block(
        &mut self,
        mut block: Block,
        config: Option<BlockConfig>,
    ) -> Result<(), CoreError> {
        let block_type = block.block_type();
        match (&config, block_type.carries_payload()) {
            (Some(config), true) => {
                if config.block_type() != block_type {
                    return Err(CoreError::Validation(format!(
                        "Block '{}' is {block_type} but its payload is {}",
                        block.id,
                        config.block_type()
                    )));
                }
                block.config_id = Some(config.config_id());
            }
            (None, true) => {
                return Err(CoreError::Validation(format!(
                    "Block '{}' of type {block_type} requires a configuration payload",
                    block.id
                )));
            }
            (Some(_), false) => {
                return Err(CoreError::Validation(format!(
                    "{block_type} blocks carry no configuration payload"
                )));
            }
            (None, false) => block.config_id = None,
        }

        let block_id = block.id.clone();
        self.blocks.insert(block)?;
        if let Some(config) = config {
            self.configs.insert(block_id, config);
        }
        Ok(())
    }

    // -- integrity ------------------------------------------------------------

    /// Check the structural invariants of the document.
    ///
    /// - `order` is dense and 1-based
    /// - every payload-carrying block has a payload whose id is its `configId`
    /// - payload-free blocks have no payload and no `configId`
    /// - no payload is orphaned
    pub fn check_integrity(&self) -> Result<(), CoreError> {
        if !self.blocks.is_dense() {
            return Err(CoreError::Validation(
                "Block order must be dense and start at 1".to_string(),
            ));
        }
        for block in &self.blocks {
            let config = self.configs.get(&block.id);
            match (block.block_type().carries_payload(), config) {
                (true, Some(config)) => {
                    if block.config_id.as_deref() != Some(config.config_id().as_str()) {
                        return Err(CoreError::Validation(format!(
                            "Block '{}' points at config {:?} but holds '{}'",
                            block.id,
                            block.config_id,
                            config.config_id()
                        )));
                    }
                }
                (true, None) => {
                    return Err(CoreError::Validation(format!(
                        "Block '{}' is missing its configuration",
                        block.id
                    )));
                }
                (false, Some(_)) => {
                    return Err(CoreError::Validation(format!(
                        "Block '{}' must not carry a configuration",
                        block.id
                    )));
                }
                (false, None) => {}
            }
        }
        if let Some(orphan) = self.configs.keys().find(|id| !self.blocks.contains(id)) {
            return Err(CoreError::Validation(format!(
                "Configuration '{orphan}' belongs to no block"
            )));
        }
        Ok(())
    }

    /// Gate for saving: name set, at least one block, a company when the
    /// journey is created for one, and every payload valid.
    pub fn validate_for_save(&self, require_company: bool) -> Result<(), CoreError> {
        validate_journey_name(&self.name)?;
        if self.blocks.is_empty() {
            return Err(CoreError::Validation(
                "A journey needs at least one block".to_string(),
            ));
        }
        if require_company && self.company_id.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Select a company for this journey".to_string(),
            ));
        }
        self.check_integrity()?;
        for config in self.configs.values() {
            config.validate()?;
        }
        Ok(())
    }

    // -- persistence boundary -------------------------------------------------

    /// Flatten blocks and payloads into one array, in order.
    pub fn to_wire_blocks(&self) -> Result<Vec<BlockWithConfig>, CoreError> {
        self.blocks
            .iter()
            .map(|block| {
                let config_data = self
                    .configs
                    .get(&block.id)
                    .map(BlockConfig::to_value)
                    .transpose()?;
                Ok(BlockWithConfig {
                    block: block.clone(),
                    config_data,
                })
            })
            .collect()
    }

    /// Take over config ids assigned upstream, matched by block id.
    ///
    /// Blocks the returned list does not know, blocks whose type differs
    /// and ids already used by another block are left as they are. Returns
    /// the number of blocks re-keyed.
    pub fn adopt_config_ids(&mut self, returned: &[BlockWithConfig]) -> usize {
        let mut adopted = 0;
        for remote in returned {
            let Some(config_id) = remote_config_id(remote) else {
                continue;
            };
            let Some(local) = self.blocks.get(&remote.block.id) else {
                continue;
            };
            if local.block_type() != remote.block.block_type()
                || !local.block_type().carries_payload()
                || local.config_id.as_deref() == Some(config_id)
            {
                continue;
            }
            let clash = self.blocks.iter().any(|b| {
                b.id != remote.block.id && b.config_id.as_deref() == Some(config_id)
            });
            if clash {
                tracing::warn!(
                    block_id = %remote.block.id,
                    config_id = %config_id,
                    "Ignoring upstream config id already used by another block"
                );
                continue;
            }

            if let Some(block) = self.blocks.get_mut(&remote.block.id) {
                block.config_id = Some(config_id.to_string());
            }
            if let Some(config) = self.configs.get_mut(&remote.block.id) {
                config.set_config_id(config_id);
            }
            adopted += 1;
        }
        adopted
    }

    /// Description as sent upstream: `None` when blank.
    pub fn description_opt(&self) -> Option<String> {
        let trimmed = self.description.trim();
        (!trimmed.is_empty()).then(|| self.description.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::shoot_inspect::{ImageType, Step};

    fn three_block_doc() -> JourneyDocument {
        let mut doc = JourneyDocument::new("Std Inspection", Some("acme".to_string()));
        doc.add_block(BlockType::Form).unwrap();
        doc.add_block(BlockType::ShootInspect).unwrap();
        doc.add_block(BlockType::Static).unwrap();
        doc
    }

    fn ids(doc: &JourneyDocument) -> Vec<String> {
        doc.blocks().iter().map(|b| b.id.clone()).collect()
    }

    // -- add_block ------------------------------------------------------------

    #[test]
    fn add_block_allocates_semantic_ids_and_seed_payloads() {
        let doc = three_block_doc();
        assert_eq!(ids(&doc), ["form-step-1", "shoot-inspect-step-1", "static-step-1"]);

        let form = doc.block("form-step-1").unwrap();
        assert_eq!(form.config_id.as_deref(), Some("form-1"));
        assert_eq!(doc.config("form-step-1").unwrap().config_id(), "form-1");
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn payload_free_blocks_have_no_config() {
        let mut doc = JourneyDocument::new("J", None);
        let block = doc.add_block(BlockType::AddDamage).unwrap();
        assert!(block.config_id.is_none());
        assert!(doc.config("add-damage-step-1").is_none());
    }

    #[test]
    fn allocated_ids_never_collide_after_removal() {
        let mut doc = JourneyDocument::new("J", None);
        doc.add_block(BlockType::Form).unwrap();
        doc.add_block(BlockType::Form).unwrap();
        doc.remove_block("form-step-1").unwrap();

        let added = doc.add_block(BlockType::Form).unwrap().id.clone();
        assert_eq!(added, "form-step-3");

        let unique: HashSet<String> = ids(&doc).into_iter().collect();
        assert_eq!(unique.len(), doc.blocks().len());
    }

    // -- remove / reorder -----------------------------------------------------

    #[test]
    fn removing_middle_block_keeps_ids_and_payloads() {
        let mut doc = three_block_doc();
        doc.set_block_config("form-step-1", r#"{"id":"intake","name":"Intake"}"#)
            .unwrap();
        let static_before = doc.config("static-step-1").cloned();

        doc.remove_block("shoot-inspect-step-1").unwrap();

        assert_eq!(ids(&doc), ["form-step-1", "static-step-1"]);
        let orders: Vec<u32> = doc.blocks().iter().map(|b| b.order).collect();
        assert_eq!(orders, [1, 2]);
        assert!(doc.config("shoot-inspect-step-1").is_none());
        assert_eq!(doc.config("form-step-1").unwrap().config_id(), "intake");
        assert_eq!(doc.config("static-step-1").cloned(), static_before);
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn reorder_same_position_leaves_document_unchanged() {
        let mut doc = three_block_doc();
        let before = doc.clone();
        doc.reorder_blocks(2, 2).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn reorder_keeps_payloads_attached_to_their_blocks() {
        let mut doc = three_block_doc();
        doc.reorder_blocks(2, 0).unwrap();
        assert_eq!(ids(&doc), ["static-step-1", "form-step-1", "shoot-inspect-step-1"]);
        assert_eq!(doc.config("static-step-1").unwrap().block_type(), BlockType::Static);
        assert!(doc.check_integrity().is_ok());
    }

    // -- configuration --------------------------------------------------------

    #[test]
    fn form_payload_overrides_display_metadata() {
        let mut doc = three_block_doc();
        doc.set_block_config(
            "form-step-1",
            r#"[{"id":"vehicle-form","name":"Vehicle details","description":"VIN and mileage"}]"#,
        )
        .unwrap();

        let block = doc.block("form-step-1").unwrap();
        assert_eq!(block.name, "Vehicle details");
        assert_eq!(block.description.as_deref(), Some("VIN and mileage"));
        assert_eq!(block.config_id.as_deref(), Some("vehicle-form"));
    }

    #[test]
    fn failed_config_edit_keeps_previous_state() {
        let mut doc = three_block_doc();
        let before = doc.clone();

        assert_matches!(
            doc.set_block_config("form-step-1", "{oops"),
            Err(CoreError::Parse { .. })
        );
        assert_matches!(
            doc.set_block_config("form-step-1", "[]"),
            Err(CoreError::EmptyArray)
        );
        assert_matches!(
            doc.set_block_config("form-step-1", r#"{"name":"x"}"#),
            Err(CoreError::MissingId)
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn config_id_clash_between_blocks_rejected() {
        let mut doc = three_block_doc();
        doc.add_block(BlockType::Form).unwrap();
        doc.set_block_config("form-step-1", r#"{"id":"shared"}"#).unwrap();
        assert!(doc.set_block_config("form-step-2", r#"{"id":"shared"}"#).is_err());
    }

    #[test]
    fn shoot_inspect_config_pinned_to_block_config_id() {
        let mut doc = three_block_doc();
        let mut config = ShootInspectConfig::new("whatever", "Exterior");
        config.add_step(Step::new(ImageType::Standard, "front", "en", "Front"));

        doc.set_shoot_inspect_config("shoot-inspect-step-1", config).unwrap();

        let stored = doc.shoot_inspect_config("shoot-inspect-step-1").unwrap();
        assert_eq!(stored.id, "shoot-inspect-1");
        assert_eq!(stored.config.len(), 1);
    }

    #[test]
    fn shoot_inspect_name_mirrored_onto_block() {
        let mut doc = three_block_doc();
        let mut config = ShootInspectConfig::new("x", "Exterior");
        config.description = Some("Walk around".to_string());
        doc.set_shoot_inspect_config("shoot-inspect-step-1", config).unwrap();

        let block = doc.block("shoot-inspect-step-1").unwrap();
        assert_eq!(block.name, "Exterior");
        assert_eq!(block.description.as_deref(), Some("Walk around"));

        doc.rename_block("shoot-inspect-step-1", "Interior", None).unwrap();
        let stored = doc.shoot_inspect_config("shoot-inspect-step-1").unwrap();
        assert_eq!(stored.name, "Interior");
        assert_eq!(stored.description, None);
    }

    #[test]
    fn shoot_inspect_config_on_wrong_block_rejected() {
        let mut doc = three_block_doc();
        let config = ShootInspectConfig::new("x", "Exterior");
        assert!(doc.set_shoot_inspect_config("form-step-1", config).is_err());
    }

    #[test]
    fn form_blocks_cannot_be_renamed_directly() {
        let mut doc = three_block_doc();
        assert!(doc.rename_block("form-step-1", "Other", None).is_err());
        doc.rename_block("shoot-inspect-step-1", "Exterior photos", None)
            .unwrap();
        assert_eq!(doc.block("shoot-inspect-step-1").unwrap().name, "Exterior photos");
    }

    // -- metadata -------------------------------------------------------------

    #[test]
    fn metadata_setters() {
        let mut doc = JourneyDocument::new("J", None);
        doc.set_name("Renamed");
        doc.set_description("Desc");
        doc.set_active(false);
        doc.set_company(Some("  ".to_string()));
        assert_eq!(doc.name, "Renamed");
        assert_eq!(doc.description, "Desc");
        assert!(!doc.is_active);
        assert_eq!(doc.company_id, None);

        doc.set_name("x".repeat(500));
        assert!(validate_journey_name(&doc.name).is_ok());
    }

    // -- save gate ------------------------------------------------------------

    #[test]
    fn save_requires_name_blocks_and_company() {
        let mut doc = JourneyDocument::new("  ", None);
        assert!(doc.validate_for_save(false).is_err());

        doc.name = "Std Inspection".to_string();
        let err = doc.validate_for_save(false).unwrap_err();
        assert!(err.to_string().contains("at least one block"));

        doc.add_block(BlockType::FastTrack).unwrap();
        assert!(doc.validate_for_save(false).is_ok());
        assert!(doc.validate_for_save(true).is_err());

        doc.company_id = Some("acme".to_string());
        assert!(doc.validate_for_save(true).is_ok());
    }

    // -- wire format ----------------------------------------------------------

    #[test]
    fn wire_blocks_inline_config_data() {
        let doc = three_block_doc();
        let wire = doc.to_wire_blocks().unwrap();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].config_data, Some(json!({"id": "form-1", "name": "Form"})));

        let json = serde_json::to_value(&wire[1]).unwrap();
        assert_eq!(json["type"], "shootInspect");
        assert_eq!(json["configId"], "shoot-inspect-1");
        assert_eq!(json["configData"]["id"], "shoot-inspect-1");
        assert_eq!(json["order"], 2);
    }

    #[test]
    fn from_wire_splits_configs_back_out() {
        let doc = three_block_doc();
        let rebuilt = JourneyDocument::from_wire(
            doc.id.clone(),
            doc.name.clone(),
            None,
            doc.company_id.clone(),
            doc.is_active,
            doc.to_wire_blocks().unwrap(),
        )
        .unwrap();
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn from_wire_rejects_missing_config_data() {
        let mut wire = three_block_doc().to_wire_blocks().unwrap();
        wire[0].config_data = None;
        let result = JourneyDocument::from_wire(None, "J", None, None, true, wire);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn adopt_config_ids_rekeys_blocks_and_payloads() {
        let mut doc = three_block_doc();
        let mut returned = doc.to_wire_blocks().unwrap();
        returned[0].block.config_id = Some("srv-42".to_string());
        returned[1].block.config_id = None;
        returned[1].config_data = Some(json!({"id": "srv-43", "name": "Shoot", "config": []}));

        assert_eq!(doc.adopt_config_ids(&returned), 2);

        assert_eq!(doc.block("form-step-1").unwrap().config_id.as_deref(), Some("srv-42"));
        assert_eq!(doc.config("form-step-1").unwrap().config_id(), "srv-42");
        assert_eq!(doc.shoot_inspect_config("shoot-inspect-step-1").unwrap().id, "srv-43");
        assert_eq!(doc.config("static-step-1").unwrap().config_id(), "static-1");
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn adopt_config_ids_skips_clashes_and_unknown_blocks() {
        let mut doc = three_block_doc();
        let mut returned = doc.to_wire_blocks().unwrap();
        returned[0].block.config_id = Some("static-1".to_string());
        returned[2].block.id = "static-step-9".to_string();
        returned[2].block.config_id = Some("srv-1".to_string());
        let before = doc.clone();

        assert_eq!(doc.adopt_config_ids(&returned), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn from_wire_drops_config_data_on_payload_free_blocks() {
        let block = Block::new("fast-track-step-1", BlockType::FastTrack, "Fast", None);
        let wire = vec![BlockWithConfig {
            block,
            config_data: Some(json!({"retry": 3})),
        }];
        let doc = JourneyDocument::from_wire(None, "J", None, None, true, wire).unwrap();
        assert!(doc.config("fast-track-step-1").is_none());
        assert!(doc.check_integrity().is_ok());
    }
}
