pub mod accounts;
pub mod auth;
pub mod listings;
pub mod pages;
pub mod rubrics;
