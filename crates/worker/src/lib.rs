//! The awning worker core.
//!
//! One logical worker per application origin. The worker walks the
//! install → waiting → activating → active lifecycle, intercepts GET
//! requests while active, and answers the application's control messages.
//! Per-request routing picks one of four strategies:
//!
//! - cache-first for the application's own shell assets (STATIC partition)
//! - stale-while-revalidate for third-party assets (EXTERNAL partition)
//! - network-first with a synthetic offline body for live-data endpoints
//! - pass-through for everything it never intercepts (non-GET)
//!
//! Background work (revalidation fetches, cache writes) outlives the
//! response that triggered it; the [`tasks::TaskTracker`] holds those units
//! until they finish, standing in for the platform's extend-lifetime
//! obligation.

pub mod clients;
pub mod control;
mod lifecycle;
pub mod phase;
pub mod router;
pub mod tasks;
mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use clients::{ClientHub, ClientId, Notification};
pub use control::Command;
pub use phase::Phase;
pub use router::Route;
pub use worker::{FetchDecision, Worker};
