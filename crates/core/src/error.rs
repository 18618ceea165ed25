//! Shared error types for registry lookups.

use crate::item::{BlockKey, ItemKey};
use thiserror::Error;

/// Errors raised when an identifier is not part of the fixed content set.
///
/// These always fail fast and propagate to the top-level action handler;
/// they are programmer-visible contract violations, not recoverable
/// runtime conditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No item is registered under the given key.
    #[error("no item defined for {0}")]
    UnknownItem(ItemKey),
    /// No block is registered under the given key.
    #[error("no block defined for {0}")]
    UnknownBlock(BlockKey),
    /// No recipe table is registered for the given craft surface.
    #[error("no recipes defined for craft surface {0:?}")]
    UnknownSurface(String),
}
