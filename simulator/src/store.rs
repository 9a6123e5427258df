//! In-memory settings store.
//!
//! Stands in for the badge's flash key-value store. Values survive for the
//! lifetime of the process only.

use badge_common::config::{ConfigStore, Settings, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: Option<Settings>,
}

impl ConfigStore for MemoryStore {
    fn load(&mut self) -> Option<Settings> { self.settings }

    fn save(
        &mut self,
        settings: &Settings,
    ) -> Result<(), StoreError> {
        self.settings = Some(*settings);
        Ok(())
    }
}
