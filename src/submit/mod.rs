//! Submission pipeline — payload assembly and the create-record call.

pub mod payload;
pub mod pipeline;

pub use payload::EnrollmentPayload;
pub use pipeline::{SubmissionPipeline, SubmitOutcome, UploadReport, UploadResult, UploadTarget};
