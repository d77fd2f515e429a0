//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every write is a single SQL
//! statement, so concurrent requests are serialised by PostgreSQL's row
//! locks and unique constraints rather than by read-then-write pairs.

pub mod consultation_repo;
pub mod patient_repo;
pub mod waitlist_repo;

pub use consultation_repo::ConsultationRepo;
pub use patient_repo::PatientRepo;
pub use waitlist_repo::WaitlistRepo;
