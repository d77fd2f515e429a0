//! Domain rules for the clinic waitroom service.
//!
//! This crate has no I/O. It holds the error taxonomy, the shared id and
//! timestamp types, the waitlist state machine, and the small normalisation
//! helpers used by both the repository and HTTP layers.

pub mod error;
pub mod identity;
pub mod search;
pub mod types;
pub mod waitlist;
