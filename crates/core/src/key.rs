//! Composite (item, warehouse) key.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Separator between the item and warehouse components of a key.
pub const KEY_SEPARATOR: char = ':';

/// Key of one inventory record: `"{item_id}:{warehouse_id}"`.
///
/// Composition is deterministic so the same pair always maps to the same
/// record and to the same snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryKey(String);

impl InventoryKey {
    pub fn new(item_id: &str, warehouse_id: &str) -> Self {
        Self(format!("{item_id}{KEY_SEPARATOR}{warehouse_id}"))
    }

    /// Build a key for provisioning, rejecting components that would make
    /// composition ambiguous.
    pub fn checked(item_id: &str, warehouse_id: &str) -> DomainResult<Self> {
        check_component("item_id", item_id)?;
        check_component("warehouse_id", warehouse_id)?;
        Ok(Self::new(item_id, warehouse_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_component(field: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(DomainError::validation(format!(
            "{field} cannot contain '{KEY_SEPARATOR}'"
        )));
    }
    Ok(())
}

impl core::fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InventoryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_with_colon() {
        assert_eq!(InventoryKey::new("ABC123", "WH1").as_str(), "ABC123:WH1");
    }

    #[test]
    fn checked_rejects_separator_and_empty_components() {
        assert!(InventoryKey::checked("ABC123", "WH1").is_ok());
        assert!(matches!(
            InventoryKey::checked("A:B", "WH1"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            InventoryKey::checked("ABC123", ""),
            Err(DomainError::Validation(_))
        ));
    }
}
