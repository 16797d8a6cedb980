//! External collaborator seams — the three opaque async services the
//! engine consumes. Concrete HTTP implementations live in `http`; tests
//! use in-memory mocks.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::FileAttachment;
use crate::submit::payload::EnrollmentPayload;

/// What an uploaded document is for. Drives the remote storage path and
/// which payload field the resulting URL lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    ProfilePhoto,
    IdentityProof,
    BankProof,
    GmcPolicy,
    EducationDocument,
}

impl std::fmt::Display for UploadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ProfilePhoto => "profile_photo",
            Self::IdentityProof => "identity_proof",
            Self::BankProof => "bank_proof",
            Self::GmcPolicy => "gmc_policy",
            Self::EducationDocument => "education_document",
        };
        write!(f, "{s}")
    }
}

/// A successfully stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFile {
    pub url: String,
}

/// City/state resolved from a pincode.
#[derive(Debug, Clone, Deserialize)]
pub struct PincodeInfo {
    pub city: String,
    pub state: String,
}

/// The record returned by a successful enrollment creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRecord {
    pub id: uuid::Uuid,
}

/// Remote file storage. Failure is soft at the submission-pipeline level:
/// the pipeline logs it and leaves the URL unset.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(
        &self,
        kind: UploadKind,
        file: &FileAttachment,
        owner: Option<&str>,
    ) -> Result<StoredFile, ServiceError>;
}

/// Pincode → city/state lookup. A lookup failure maps to an inline
/// invalid-pincode field error, never a hard failure.
#[async_trait]
pub trait PincodeLookup: Send + Sync {
    async fn lookup(&self, pincode: &str) -> Result<PincodeInfo, ServiceError>;
}

/// Enrollment record creation. `None` is treated identically to an error.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn create(
        &self,
        payload: &EnrollmentPayload,
    ) -> Result<Option<CreatedRecord>, ServiceError>;
}
