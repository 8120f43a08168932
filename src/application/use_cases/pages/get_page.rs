use crate::application::ports::page_store::PageStore;
use crate::application::services::pages::{self, RenderedPage};

pub struct GetPage<'a, P: PageStore + ?Sized> {
    pub store: &'a P,
}

impl<'a, P: PageStore + ?Sized> GetPage<'a, P> {
    /// None for unknown or malformed page names.
    pub async fn execute(&self, name: &str) -> anyhow::Result<Option<RenderedPage>> {
        if !pages::is_valid_page_name(name) {
            return Ok(None);
        }
        let Some(source) = self.store.load(name).await? else {
            return Ok(None);
        };
        pages::render_page(&source).map(Some)
    }
}
