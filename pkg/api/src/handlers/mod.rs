pub mod environment_variables;
pub mod health;
