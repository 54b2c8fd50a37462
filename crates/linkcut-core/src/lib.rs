//! Core types and traits for the linkcut URL shortener.
//!
//! This crate provides the storage contract shared by every backend
//! and the HTTP gateway.

pub mod base_url;
pub mod error;
pub mod storage;

pub use base_url::BaseUrl;
pub use error::{Result, StorageError};
pub use storage::{Storage, UserUrl};
