//! The ordered block sequence of one journey.
//!
//! Owns the position invariant: after every operation the `order` values
//! are exactly `1..=len`, each used once, and iteration order matches
//! `order` ascending.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::CoreError;

/// Move the element at `from` to `to`, shifting the elements in between.
///
/// A no-op when `from == to`. Both indices must be in range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), CoreError> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(CoreError::Validation(format!(
            "Cannot move from {from} to {to}: indices must be below {len}"
        )));
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// Pure form of [`OrderedBlockList::reorder`]: returns the reordered,
/// renumbered sequence and leaves the input untouched.
pub fn reorder(blocks: &[Block], from: usize, to: usize) -> Result<Vec<Block>, CoreError> {
    let mut list = OrderedBlockList {
        blocks: blocks.to_vec(),
    };
    list.reorder(from, to)?;
    Ok(list.blocks)
}

/// Dense, 1-based ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedBlockList {
    blocks: Vec<Block>,
}

impl OrderedBlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from blocks in any order.
    ///
    /// Blocks are sorted by their incoming `order` and then renumbered, so
    /// gaps in persisted data are closed. Duplicate ids are rejected.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Result<Self, CoreError> {
        blocks.sort_by_key(|b| b.order);
        for (index, block) in blocks.iter().enumerate() {
            if blocks[..index].iter().any(|other| other.id == block.id) {
                return Err(CoreError::Validation(format!(
                    "Duplicate block id '{}'",
                    block.id
                )));
            }
        }
        let mut list = Self { blocks };
        list.renumber();
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn get_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    pub fn contains(&self, block_id: &str) -> bool {
        self.get(block_id).is_some()
    }

    /// Append a block at the tail and assign `order = len + 1`.
    pub fn insert(&mut self, mut block: Block) -> Result<&Block, CoreError> {
        if self.contains(&block.id) {
            return Err(CoreError::Validation(format!(
                "Block id '{}' is already in use",
                block.id
            )));
        }
        block.order = self.blocks.len() as u32 + 1;
        self.blocks.push(block);
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Remove a block and close the gap it leaves.
    pub fn remove(&mut self, block_id: &str) -> Result<Block, CoreError> {
        let index = self
            .blocks
            .iter()
            .position(|b| b.id == block_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Block",
                id: block_id.to_string(),
            })?;
        let removed = self.blocks.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move the block at `from` to `to` and renumber every block.
    ///
    /// `reorder(i, i)` leaves the list untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        move_item(&mut self.blocks, from, to)?;
        if from != to {
            self.renumber();
        }
        Ok(())
    }

    /// Number of blocks of the given type.
    pub fn count_of(&self, block_type: crate::block::BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block_type() == block_type)
            .count()
    }

    /// Whether `order` values are exactly `1..=len` in iteration order.
    pub fn is_dense(&self) -> bool {
        self.blocks
            .iter()
            .enumerate()
            .all(|(index, b)| b.order as usize == index + 1)
    }

    fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index as u32 + 1;
        }
    }
}

impl<'a> IntoIterator for &'a OrderedBlockList {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
