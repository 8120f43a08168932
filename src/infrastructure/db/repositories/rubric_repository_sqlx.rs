use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::rubric_repository::RubricRepository;
use crate::domain::rubrics::rubric::{Rubric, SubRubric};
use crate::infrastructure::db::PgPool;

pub struct SqlxRubricRepository {
    pub pool: PgPool,
}

impl SqlxRubricRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RubricRepository for SqlxRubricRepository {
    async fn list_all(&self) -> anyhow::Result<Vec<Rubric>> {
        let rows = sqlx::query(
            r#"SELECT id, name, "order", super_rubric_id FROM rubrics ORDER BY "order", name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Rubric {
                id: r.get("id"),
                name: r.get("name"),
                order: r.get("order"),
                super_rubric_id: r.get("super_rubric_id"),
            })
            .collect())
    }

    async fn get_sub_rubric(&self, id: i64) -> anyhow::Result<Option<SubRubric>> {
        let row = sqlx::query(
            r#"SELECT r.id, r.name, r."order", r.super_rubric_id, s.name AS super_rubric_name
               FROM rubrics r
               JOIN rubrics s ON s.id = r.super_rubric_id
               WHERE r.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| SubRubric {
            id: r.get("id"),
            name: r.get("name"),
            order: r.get("order"),
            super_rubric_id: r.get("super_rubric_id"),
            super_rubric_name: r.get("super_rubric_name"),
        }))
    }
}
