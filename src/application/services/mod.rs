pub mod pages;
pub mod pagination;
pub mod passwords;
pub mod signing;
