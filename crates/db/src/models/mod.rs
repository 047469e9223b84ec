//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct matching the database columns
//! - The domain entity the rest of the workspace works with
//! - A `Serialize` response struct safe to hand to clients
//! - `Deserialize`-free create/update DTOs for the store

pub mod account;
