//! Core types and service wiring for the scraps food waste ledger.

/// Per-category and per-day totals derived from logged entries.
pub mod aggregate;
/// Append-only collection of waste entries.
pub mod ledger;
/// Domain models: categories, entries, and identifiers.
pub mod model;
/// Traits describing storage and animation collaborators, plus their errors.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// File-backed record store for durable ledgers.
pub mod store;

pub use aggregate::*;
pub use ledger::*;
pub use model::*;
pub use ports::*;
pub use service::*;
pub use store::*;
