pub mod config;
pub mod environment_variable;
pub mod validate;
