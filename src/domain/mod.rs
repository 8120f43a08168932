pub mod listings;
pub mod rubrics;
pub mod users;
