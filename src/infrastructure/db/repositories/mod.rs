pub mod listing_repository_sqlx;
pub mod rubric_repository_sqlx;
pub mod user_repository_sqlx;
