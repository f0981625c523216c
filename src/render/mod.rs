pub mod renderer;
pub mod validator;
