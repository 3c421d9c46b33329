//! Core types for the review client

pub mod clause;
pub mod job;
pub mod payload;

pub use clause::Clause;
pub use job::{JobSnapshot, JobStatus, SubmitReceipt};
pub use payload::{DocumentPayload, ACCEPTED_MEDIA_TYPES, MAX_UPLOAD_SIZE};
