use async_trait::async_trait;

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Markdown source of a named informational page.
    async fn load(&self, name: &str) -> anyhow::Result<Option<String>>;
}
