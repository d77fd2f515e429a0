//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the corresponding repository in `waitroom_db`
//! and map errors via [`AppError`](crate::error::AppError).

pub mod consultation;
pub mod patient;
pub mod waitlist;
