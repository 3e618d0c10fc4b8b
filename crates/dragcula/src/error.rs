//! Error types for registry operations.
//!
//! Everything event-driven in this crate logs and degrades instead of
//! failing; only explicit registration APIs return errors.

use std::fmt;

use dragcula_core::{ItemId, ZoneId};

/// Errors from zone/item registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A zone with this id is already registered.
    DuplicateZone {
        id: ZoneId,
    },
    /// An item with this id is already registered.
    DuplicateItem {
        id: ItemId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateZone { id } => {
                write!(f, "zone {id} is already registered")
            }
            RegistryError::DuplicateItem { id } => {
                write!(f, "item {id} is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
