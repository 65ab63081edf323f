// File-backed configuration repository
use crate::application::config_repository::ConfigRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Stores each key as `<directory>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileConfigRepository {
    directory: PathBuf,
}

impl FileConfigRepository {
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await.with_context(|| {
            format!("Failed to create storage directory {}", directory.display())
        })?;
        Ok(Self { directory })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid storage key: {:?}", key);
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so readers never see a torn file
        let staging = path.with_extension("json.tmp");

        tokio::fs::write(&staging, value)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        tracing::debug!("Saved {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}
