use crate::application::ports::rubric_repository::RubricRepository;
use crate::domain::rubrics::rubric::{SuperRubric, build_tree};

pub struct ListRubrics<'a, R: RubricRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RubricRepository + ?Sized> ListRubrics<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<SuperRubric>> {
        let all = self.repo.list_all().await?;
        Ok(build_tree(all))
    }
}
