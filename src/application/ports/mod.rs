pub mod activation_notifier;
pub mod image_storage;
pub mod listing_repository;
pub mod page_store;
pub mod rubric_repository;
pub mod user_repository;
