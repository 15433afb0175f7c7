//! Journey composition engine for the inspection admin console.
//!
//! Pure domain logic with no I/O:
//!
//! - [`journey::JourneyDocument`] — one journey: metadata, the ordered
//!   block list and the block configuration side-table.
//! - [`block_config`] — parsing and validation of block payloads.
//! - [`identifiers`] — semantic id allocation for blocks and configs.
//! - [`duplication`] / [`company`] — journey copies and the company
//!   duplication context.
//! - [`codec`] — JSON import/export.

pub mod block;
pub mod block_config;
pub mod block_list;
pub mod codec;
pub mod company;
pub mod duplication;
pub mod error;
pub mod identifiers;
pub mod journey;
pub mod shoot_inspect;
pub mod types;
pub mod workflow;

pub use block::{Block, BlockType};
pub use block_config::BlockConfig;
pub use error::CoreError;
pub use journey::{BlockWithConfig, JourneyDocument};
