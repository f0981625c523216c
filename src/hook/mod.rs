pub mod app_main;
pub mod hook;
