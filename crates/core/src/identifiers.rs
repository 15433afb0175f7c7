//! Semantic identifier allocation for blocks and their config objects.
//!
//! Identifiers encode the block type and its ordinal among blocks of that
//! type (`form-step-2`, `shoot-inspect-3`). They are unique within one
//! journey document only.

use crate::block::BlockType;

/// Identifiers handed out for a new block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    pub block_id: String,
    /// Present only for block types that carry a payload.
    pub config_id: Option<String>,
}

/// Derive identifiers for the next block of `block_type`, given how many
/// blocks of that type the document already holds.
pub fn allocate(block_type: BlockType, existing_of_type: usize) -> Identifiers {
    let ordinal = existing_of_type + 1;
    let slug = block_type.slug();

    Identifiers {
        block_id: format!("{slug}-step-{ordinal}"),
        config_id: block_type
            .carries_payload()
            .then(|| format!("{slug}-{ordinal}")),
    }
}

/// Allocate identifiers that do not collide with any id for which `taken`
/// returns `true`.
///
/// Starts at the ordinal implied by `existing_of_type` and steps forward past taken ids.
/// Removing an earlier block leaves later ordinals in place, so the plain
/// count alone can point at an id that is still in use.
pub fn allocate_free(
    block_type: BlockType,
    existing_of_type: usize,
    taken: impl Fn(&str) -> bool,
) -> Identifiers {
    let mut count = existing_of_type;
    loop {
        let ids = allocate(block_type, count);
        let config_taken = ids.config_id.as_deref().is_some_and(&taken);
        if !taken(&ids.block_id) && !config_taken {
            return ids;
        }
        count += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
