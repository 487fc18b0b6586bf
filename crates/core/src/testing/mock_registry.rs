//! In-memory registry for path resolution tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::RegistryValue;
use crate::paths::RegistrySource;

/// Registry source answering from a fixed map of values.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    values: RwLock<HashMap<RegistryValue, String>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the string stored under `value`.
    pub fn set(&self, value: RegistryValue, data: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(value, data.into());
        }
    }

    pub fn remove(&self, value: &RegistryValue) {
        if let Ok(mut values) = self.values.write() {
            values.remove(value);
        }
    }
}

#[async_trait]
impl RegistrySource for StaticRegistry {
    async fn read_string(&self, value: &RegistryValue) -> Option<String> {
        self.values.read().ok()?.get(value).cloned()
    }
}
