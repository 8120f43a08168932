use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Path relative to the uploads root; this is what gets persisted.
    pub relative_path: String,
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn store_image(
        &self,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredImage>;
    /// Removing a file that is already gone is not an error.
    async fn delete_image(&self, relative_path: &str) -> anyhow::Result<()>;
}
