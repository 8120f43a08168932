pub mod get_page;
