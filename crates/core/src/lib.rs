//! Core types and shared functionality for awning.
//!
//! This crate provides:
//! - The request/response model and synthetic offline responses
//! - The SQLite-backed partition store
//! - The versioned partition registry
//! - Configuration and unified error types
//! - The `Transport` seam the worker fetches through

pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod store;
pub mod transport;

pub use config::AppConfig;
pub use error::Error;
pub use http::{CachedResponse, Method, Request};
pub use registry::PartitionRegistry;
pub use store::StoreDb;
pub use transport::Transport;
