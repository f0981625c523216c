pub mod identity;
pub mod loader;
pub mod navigator;
pub mod router;
pub mod state_model;
pub mod submitter;
