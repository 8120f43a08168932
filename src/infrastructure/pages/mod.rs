use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::page_store::PageStore;
use crate::application::services::pages::is_valid_page_name;

/// Reads `<root>/<name>.md`.
pub struct FsPageStore {
    pub root: PathBuf,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PageStore for FsPageStore {
    async fn load(&self, name: &str) -> anyhow::Result<Option<String>> {
        if !is_valid_page_name(name) {
            return Ok(None);
        }
        let path = self.root.join(format!("{name}.md"));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
