pub mod errors;
pub mod forms;
pub mod ports;
pub mod services;
pub mod use_cases;
