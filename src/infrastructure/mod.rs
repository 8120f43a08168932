pub mod db;
pub mod notify;
pub mod pages;
pub mod storage;
