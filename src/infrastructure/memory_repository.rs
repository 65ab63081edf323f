// In-memory configuration repository
use crate::application::config_repository::ConfigRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps configuration documents in process memory; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryConfigRepository {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored value directly
    #[cfg(test)]
    pub fn insert(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.write(key, value)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .write()
            .map_err(|_| anyhow::anyhow!("configuration lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for MemoryConfigRepository {
    async fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.write(key, value)
    }
}
