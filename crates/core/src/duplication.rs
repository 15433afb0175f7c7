//! Client-side journey duplication.
//!
//! A copy never reuses a block identifier from its source: every block is
//! re-identified while payloads and `configId`s are deep-copied unchanged.
//! The source document is only ever read.

use crate::block::Block;
use crate::error::CoreError;
use crate::identifiers;
use crate::journey::{validate_journey_name, JourneyDocument};
use crate::types::CompanyId;

/// Suffix appended to the source name to build the default copy name.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Default name for a copy of a journey called `name`.
pub fn default_copy_name(name: &str) -> String {
    format!("{}{COPY_SUFFIX}", name.trim())
}

/// Staging object for duplicating one journey.
///
/// Starts with the default copy name and the source company; the operator
/// may change either before executing.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyDuplication<'a> {
    source: &'a JourneyDocument,
    pub name: String,
    pub company_id: Option<CompanyId>,
}

impl<'a> JourneyDuplication<'a> {
    pub fn new(source: &'a JourneyDocument) -> Self {
        Self {
            source,
            name: default_copy_name(&source.name),
            company_id: source.company_id.clone(),
        }
    }

    /// Produce the copy. Fails only when the chosen name is blank.
    pub fn execute(&self) -> Result<JourneyDocument, CoreError> {
        validate_journey_name(&self.name)?;
        copy_journey(self.source, self.name.trim(), self.company_id.clone())
    }
}

/// Copy every journey of a company into `target_company`, keeping names.
pub fn duplicate_company_journeys(
    journeys: &[JourneyDocument],
    target_company: &CompanyId,
) -> Result<Vec<JourneyDocument>, CoreError> {
    journeys
        .iter()
        .map(|journey| copy_journey(journey, &journey.name, Some(target_company.clone())))
        .collect()
}

/// Build an independent copy of `source`.
///
/// Block ids are allocated against the copy's own sequence, starting from an
/// empty document, skipping any id the source still uses so the two id sets
/// are disjoint.
fn copy_journey(
    source: &JourneyDocument,
    name: &str,
    company_id: Option<CompanyId>,
) -> Result<JourneyDocument, CoreError> {
    let mut copy = JourneyDocument::new(name, company_id);
    copy.description = source.description.clone();
    copy.is_active = source.is_active;

    for block in source.blocks() {
        let block_type = block.block_type();
        let ids = identifiers::allocate_free(block_type, copy.blocks().count_of(block_type), |id| {
            source.blocks().contains(id) || copy.blocks().contains(id)
        });

        let mut fresh = Block::new(
            ids.block_id,
            block_type,
            block.name.clone(),
            block.config_id.clone(),
        );
        fresh.description = block.description.clone();

        copy.push_block(fresh, source.config(&block.id).cloned())?;
    }

    Ok(copy)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::block::BlockType;
    use crate::shoot_inspect::{ImageType, ShootInspectConfig, Step};

    fn source() -> JourneyDocument {
        let mut doc = JourneyDocument::new("Std Inspection", Some("acme".to_string()));
        doc.description = "Default inspection flow".to_string();
        doc.add_block(BlockType::Form).unwrap();
        doc.add_block(BlockType::ShootInspect).unwrap();
        doc.add_block(BlockType::Static).unwrap();

        doc.set_block_config("form-step-1", r#"{"id":"intake","name":"Intake","fields":[1,2]}"#)
            .unwrap();
        let mut shoot = ShootInspectConfig::new("x", "Exterior");
        shoot.add_step(Step::new(ImageType::Additional, "wheel", "en", "Wheel"));
        doc.set_shoot_inspect_config("shoot-inspect-step-1", shoot).unwrap();
        doc
    }

    #[test]
    fn default_name_appends_copy_suffix() {
        let doc = source();
        let dup = JourneyDuplication::new(&doc);
        assert_eq!(dup.name, "Std Inspection (Copy)");
        assert_eq!(dup.company_id.as_deref(), Some("acme"));
    }

    #[test]
    fn copy_has_disjoint_block_ids_and_equal_payloads() {
        let doc = source();
        let copy = JourneyDuplication::new(&doc).execute().unwrap();

        assert_eq!(copy.name, "Std Inspection (Copy)");
        assert_eq!(copy.blocks().len(), 3);
        assert!(copy.id.is_none());

        let source_ids: HashSet<&str> = doc.blocks().iter().map(|b| b.id.as_str()).collect();
        for (original, copied) in doc.blocks().iter().zip(copy.blocks()) {
            assert!(!source_ids.contains(copied.id.as_str()));
            assert_eq!(copied.block_type(), original.block_type());
            assert_eq!(copied.order, original.order);
            assert_eq!(copied.config_id, original.config_id);
            assert_eq!(copy.config(&copied.id), doc.config(&original.id));
        }
        assert!(copy.check_integrity().is_ok());
    }

    #[test]
    fn copy_preserves_description_and_active_flag() {
        let mut doc = source();
        doc.is_active = false;
        let copy = JourneyDuplication::new(&doc).execute().unwrap();
        assert_eq!(copy.description, "Default inspection flow");
        assert!(!copy.is_active);
    }

    #[test]
    fn source_is_not_mutated() {
        let doc = source();
        let before = doc.clone();
        let mut dup = JourneyDuplication::new(&doc);
        dup.name = "Other".to_string();
        dup.company_id = Some("globex".to_string());
        let copy = dup.execute().unwrap();

        assert_eq!(doc, before);
        assert_eq!(copy.company_id.as_deref(), Some("globex"));
    }

    #[test]
    fn blank_name_rejected() {
        let doc = source();
        let mut dup = JourneyDuplication::new(&doc);
        dup.name = "   ".to_string();
        assert!(dup.execute().is_err());
    }

    #[test]
    fn company_journeys_copied_to_target() {
        let journeys = vec![source(), JourneyDocument::new("Quick check", None)];
        let copies = duplicate_company_journeys(&journeys, &"globex".to_string()).unwrap();

        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].name, "Std Inspection");
        assert!(copies
            .iter()
            .all(|c| c.company_id.as_deref() == Some("globex")));
    }
}
