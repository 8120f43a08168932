pub mod list_rubrics;
