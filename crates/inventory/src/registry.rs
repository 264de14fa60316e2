use std::collections::HashMap;

use stockhold_core::{DomainError, DomainResult, InventoryKey};

use crate::record::InventoryRecord;

/// Mapping from composed (item, warehouse) key to its inventory record.
///
/// Has no lock of its own: it lives inside the service-wide lock, which
/// guards the key space. Records carry their own lock for their counters.
#[derive(Debug, Default)]
pub struct InventoryRegistry {
    records: HashMap<InventoryKey, InventoryRecord>,
}

impl InventoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &InventoryKey) -> DomainResult<&InventoryRecord> {
        self.records
            .get(key)
            .ok_or_else(|| DomainError::not_found(format!("item {key}")))
    }

    pub fn contains(&self, key: &InventoryKey) -> bool {
        self.records.contains_key(key)
    }

    /// Register a new record. Provisioning the same key twice is a conflict.
    pub fn insert(&mut self, record: InventoryRecord) -> DomainResult<()> {
        let key = record.key().clone();
        if self.records.contains_key(&key) {
            return Err(DomainError::conflict(format!("item {key} already provisioned")));
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &InventoryKey> {
        self.records.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
