use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::rubrics::list_rubrics::ListRubrics;
use crate::bootstrap::app_context::AppContext;
use crate::domain::rubrics::rubric::{SubRubric, SuperRubric};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct SubRubricItem {
    pub id: i64,
    pub name: String,
    pub order: i16,
    pub super_rubric_id: i64,
    pub super_rubric_name: String,
}

impl From<SubRubric> for SubRubricItem {
    fn from(r: SubRubric) -> Self {
        Self {
            id: r.id,
            name: r.name,
            order: r.order,
            super_rubric_id: r.super_rubric_id,
            super_rubric_name: r.super_rubric_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuperRubricItem {
    pub id: i64,
    pub name: String,
    pub order: i16,
    pub sub_rubrics: Vec<SubRubricItem>,
}

impl From<SuperRubric> for SuperRubricItem {
    fn from(r: SuperRubric) -> Self {
        Self {
            id: r.id,
            name: r.name,
            order: r.order,
            sub_rubrics: r.sub_rubrics.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rubrics", get(list_rubrics))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/rubrics", tag = "Rubrics", security(()), responses(
    (status = 200, description = "Navigation tree", body = [SuperRubricItem])
))]
pub async fn list_rubrics(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<SuperRubricItem>>, ApiError> {
    let repo = ctx.rubric_repo();
    let uc = ListRubrics {
        repo: repo.as_ref(),
    };
    let tree = uc.execute().await?;
    Ok(Json(tree.into_iter().map(Into::into).collect()))
}
