//! Pantry Core - Shared domain types.
//!
//! This crate provides the types used across all pantry components:
//! - `app` - Storage, repositories, recipe generation and observable state
//! - `cli` - Command-line shell over the application stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, pantry entities, validated names and the API key

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
