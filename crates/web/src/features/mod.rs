pub mod auth;
pub mod evaluation;
