use async_trait::async_trait;

use crate::domain::rubrics::rubric::{Rubric, SubRubric};

#[async_trait]
pub trait RubricRepository: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Rubric>>;
    /// Only rubrics that have a super rubric qualify.
    async fn get_sub_rubric(&self, id: i64) -> anyhow::Result<Option<SubRubric>>;
}
