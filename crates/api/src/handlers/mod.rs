//! Request handlers.
//!
//! Handlers assume the guard pipeline has already authorized the request;
//! they only apply rules that depend on the request body or stored state.

pub mod auth;
pub mod users;
