//! Domain model for the recordings catalog.
//!
//! # Invariants
//! - Album identity is an integer assigned by the store, never by callers.
//! - Records are created and read; nothing in this crate updates or deletes them.

pub mod album;
