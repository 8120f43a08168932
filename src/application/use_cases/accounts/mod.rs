pub mod change_password;
pub mod delete_account;
pub mod profile;
pub mod update_profile;
