//! Network transport for awning.
//!
//! This crate provides the reqwest-backed implementation of the core
//! `Transport` seam, plus URL canonicalization for stable cache identity.

pub mod net;

pub use net::{ClientConfig, NetworkClient, UrlError, canonicalize};
