pub mod form_model;
pub mod method_name;
