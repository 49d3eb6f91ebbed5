//! SQLite-backed partition store.
//!
//! Persistent request→response mappings grouped into named partitions, using
//! SQLite with async access via tokio-rusqlite. A partition exists from its
//! first `put` and is destroyed only by explicit deletion (activation
//! cleanup or a full clear). It supports:
//!
//! - UPSERT writes: at most one entry per (method, URL) key per partition
//! - Lookup by canonical request identity
//! - Enumerating all partition names
//! - Deleting a partition wholesale
//! - Automatic schema migrations and WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod migrations;

pub use crate::Error;

pub use connection::StoreDb;
