// Repository trait for persisted chart configuration
use async_trait::async_trait;

/// Durable key-value storage holding JSON documents
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Read the raw value stored under `key`, if any
    async fn load(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn save(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
