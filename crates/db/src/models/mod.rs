//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - Result types for operations that report more than the row itself

pub mod consultation;
pub mod patient;
pub mod waitlist;
