use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Durable store for uploaded menu item photos. The production backend is a
/// local directory served statically; tests point it at a tempdir.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn save(&self, filename: &str, data: &[u8]) -> anyhow::Result<()>;
    async fn remove(&self, filename: &str) -> anyhow::Result<()>;
    async fn exists(&self, filename: &str) -> bool;
}

pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, filename: &str) -> anyhow::Result<PathBuf> {
        // Filenames are generated server-side, but reject separators anyway
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            anyhow::bail!("invalid photo filename: {}", filename);
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, filename: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    async fn remove(&self, filename: &str) -> anyhow::Result<()> {
        let path = self.path_for(filename)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exists(&self, filename: &str) -> bool {
        match self.path_for(filename) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

pub async fn setup_storage(upload_dir: &str) -> anyhow::Result<Arc<LocalPhotoStore>> {
    tokio::fs::create_dir_all(upload_dir).await?;
    info!("🖼️  Photo storage: {}", upload_dir);
    Ok(Arc::new(LocalPhotoStore::new(upload_dir)))
}
