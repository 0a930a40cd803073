//! Pantry application library.
//!
//! Everything behind the UI: durable storage of the three collections and the
//! API key, per-collection repositories, the recipe generation client, and the
//! observable state stores a UI subscribes to.
//!
//! # Control Flow
//!
//! A UI action calls a state store, the store calls its repository, the
//! repository does a full read-modify-write of the collection, and the store
//! reloads the collection and publishes the new snapshot to subscribers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod openai;
pub mod repository;
pub mod state;
pub mod storage;

pub use config::{AppConfig, ConfigError, OpenAiConfig};
pub use error::AppError;
pub use state::AppState;
