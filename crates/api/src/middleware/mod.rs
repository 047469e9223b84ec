pub mod auth;
pub mod guards;
