//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules.

pub mod persistence;
