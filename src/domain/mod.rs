//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain enums and re-exports
//! - `wire.rs` — Serde structs matching the API's request fragments and responses
//! - `client.rs` — Sub-client with one method per API operation

pub mod profitsharing;
pub mod transaction;
