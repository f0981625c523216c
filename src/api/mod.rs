pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod translator;
