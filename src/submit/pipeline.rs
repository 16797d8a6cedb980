//! Submission pipeline — uploads pending attachments, assembles the wire
//! payload, and commits the create-record call.
//!
//! Uploads are best-effort: a failed upload leaves its URL unset and never
//! aborts the submission. The store resets only after the creation call
//! has unambiguously succeeded; any failure leaves every section intact
//! so the user can retry without re-entering data.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::{FileStore, RecordService, UploadKind};
use crate::store::{FileAttachment, IntakeStore};

use super::payload::EnrollmentPayload;

/// Which attachment slot an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    ProfilePhoto,
    IdentityProof,
    BankProof,
    GmcPolicy,
    Education { record_id: u64 },
}

impl UploadTarget {
    fn kind(self) -> UploadKind {
        match self {
            Self::ProfilePhoto => UploadKind::ProfilePhoto,
            Self::IdentityProof => UploadKind::IdentityProof,
            Self::BankProof => UploadKind::BankProof,
            Self::GmcPolicy => UploadKind::GmcPolicy,
            Self::Education { .. } => UploadKind::EducationDocument,
        }
    }
}

/// Outcome of one upload attempt. Failures are tagged, not swallowed, so
/// the partial-failure payload shape is deterministic and assertable.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadResult {
    Stored { url: String },
    SoftFailed { error: String },
}

/// One attachment's upload report, included in the submission outcome.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub target: UploadTarget,
    pub file_name: String,
    #[serde(flatten)]
    pub result: UploadResult,
}

/// Structured submission result for the host wizard — never thrown.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub uploads: Vec<UploadReport>,
}

/// Uploads attachments, assembles the payload, and creates the record.
pub struct SubmissionPipeline {
    files: Arc<dyn FileStore>,
    records: Arc<dyn RecordService>,
    user_id: String,
}

impl SubmissionPipeline {
    pub fn new(files: Arc<dyn FileStore>, records: Arc<dyn RecordService>, user_id: impl Into<String>) -> Self {
        Self {
            files,
            records,
            user_id: user_id.into(),
        }
    }

    /// Run the full submission against the shared store.
    pub async fn submit(&self, store: &RwLock<IntakeStore>) -> SubmitOutcome {
        // Work on a snapshot clone; the live store is only touched by the
        // final reset.
        let mut snapshot = store.read().await.clone();

        let pending = collect_pending(&snapshot);
        let reports = self.upload_all(&pending).await;
        apply_upload_urls(&mut snapshot, &reports);

        let payload = EnrollmentPayload::from_snapshot(&snapshot, &self.user_id);

        match self.records.create(&payload).await {
            Ok(Some(record)) => {
                store.write().await.reset();
                tracing::info!(record_id = %record.id, "Enrollment record created");
                SubmitOutcome {
                    success: true,
                    record_id: Some(record.id),
                    error: None,
                    uploads: reports,
                }
            }
            Ok(None) => SubmitOutcome {
                success: false,
                record_id: None,
                error: Some("Record creation returned no record".into()),
                uploads: reports,
            },
            Err(e) => SubmitOutcome {
                success: false,
                record_id: None,
                error: Some(e.to_string()),
                uploads: reports,
            },
        }
    }

    /// Launch all uploads concurrently and wait for every attempt to
    /// resolve. Payload assembly must not start before that.
    async fn upload_all(&self, pending: &[(UploadTarget, FileAttachment)]) -> Vec<UploadReport> {
        let futures = pending.iter().map(|(target, file)| {
            let target = *target;
            async move {
                let result = match self
                    .files
                    .upload(target.kind(), file, Some(&self.user_id))
                    .await
                {
                    Ok(stored) => UploadResult::Stored { url: stored.url },
                    Err(e) => {
                        tracing::warn!(
                            kind = %target.kind(),
                            file = %file.file_name,
                            error = %e,
                            "Attachment upload failed; continuing without it"
                        );
                        UploadResult::SoftFailed {
                            error: e.to_string(),
                        }
                    }
                };
                UploadReport {
                    target,
                    file_name: file.file_name.clone(),
                    result,
                }
            }
        });
        join_all(futures).await
    }
}

/// Every file-bearing field across sections with a still-pending local file.
fn collect_pending(store: &IntakeStore) -> Vec<(UploadTarget, FileAttachment)> {
    let mut pending = Vec::new();

    let mut push = |target: UploadTarget, file: &Option<FileAttachment>| {
        if let Some(file) = file {
            if file.is_pending() {
                pending.push((target, file.clone()));
            }
        }
    };

    push(UploadTarget::ProfilePhoto, &store.personal.profile_photo);
    push(UploadTarget::IdentityProof, &store.personal.identity_proof);
    push(UploadTarget::BankProof, &store.bank.proof);
    push(UploadTarget::GmcPolicy, &store.gmc.policy_copy);
    for record in &store.education {
        push(
            UploadTarget::Education { record_id: record.id },
            &record.document,
        );
    }

    pending
}

/// Write resolved URLs back into the snapshot so the payload assembler
/// sees them. Soft failures leave the attachment URL unset.
fn apply_upload_urls(store: &mut IntakeStore, reports: &[UploadReport]) {
    for report in reports {
        let UploadResult::Stored { url } = &report.result else {
            continue;
        };
        let slot = match report.target {
            UploadTarget::ProfilePhoto => &mut store.personal.profile_photo,
            UploadTarget::IdentityProof => &mut store.personal.identity_proof,
            UploadTarget::BankProof => &mut store.bank.proof,
            UploadTarget::GmcPolicy => &mut store.gmc.policy_copy,
            UploadTarget::Education { record_id } => {
                match store.education.iter_mut().find(|r| r.id == record_id) {
                    Some(record) => &mut record.document,
                    None => continue,
                }
            }
        };
        if let Some(file) = slot {
            file.url = Some(url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    use crate::error::ServiceError;
    use crate::services::{CreatedRecord, StoredFile};
    use crate::store::{BankPatch, EducationPatch, PersonalPatch};

    /// File store that fails uploads of the listed kinds.
    struct MockFiles {
        fail_kinds: Vec<UploadKind>,
    }

    #[async_trait]
    impl FileStore for MockFiles {
        async fn upload(
            &self,
            kind: UploadKind,
            file: &FileAttachment,
            _owner: Option<&str>,
        ) -> Result<StoredFile, ServiceError> {
            if self.fail_kinds.contains(&kind) {
                return Err(ServiceError::Http("connection reset".into()));
            }
            Ok(StoredFile {
                url: format!("https://files.test/{kind}/{}", file.file_name),
            })
        }
    }

    /// Record service that captures the payload it was given.
    struct MockRecords {
        fail: bool,
        return_none: bool,
        seen: Mutex<Option<serde_json::Value>>,
    }

    impl MockRecords {
        fn ok() -> Self {
            Self {
                fail: false,
                return_none: false,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RecordService for MockRecords {
        async fn create(
            &self,
            payload: &EnrollmentPayload,
        ) -> Result<Option<CreatedRecord>, ServiceError> {
            *self.seen.lock().unwrap() = Some(serde_json::to_value(payload).unwrap());
            if self.fail {
                return Err(ServiceError::Status {
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            if self.return_none {
                return Ok(None);
            }
            Ok(Some(CreatedRecord { id: Uuid::new_v4() }))
        }
    }

    fn filled_store() -> IntakeStore {
        let mut store = IntakeStore::new();
        store.update_personal(PersonalPatch {
            first_name: Some("Asha".into()),
            mobile: Some("9812345678".into()),
            salary: Some(dec!(30000)),
            ..Default::default()
        });
        store
    }

    fn pipeline(
        files: MockFiles,
        records: Arc<MockRecords>,
    ) -> SubmissionPipeline {
        SubmissionPipeline::new(Arc::new(files), records, "user-1")
    }

    #[tokio::test]
    async fn success_resets_the_store() {
        let store = RwLock::new(filled_store());
        let records = Arc::new(MockRecords::ok());
        let outcome = pipeline(MockFiles { fail_kinds: vec![] }, records)
            .submit(&store)
            .await;

        assert!(outcome.success);
        assert!(outcome.record_id.is_some());
        assert_eq!(store.read().await.personal, Default::default());
    }

    #[tokio::test]
    async fn failure_preserves_the_store() {
        let store = RwLock::new(filled_store());
        let records = Arc::new(MockRecords {
            fail: true,
            ..MockRecords::ok()
        });
        let outcome = pipeline(MockFiles { fail_kinds: vec![] }, records)
            .submit(&store)
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
        assert_eq!(store.read().await.personal.first_name, "Asha");
    }

    #[tokio::test]
    async fn missing_record_is_a_failure() {
        let store = RwLock::new(filled_store());
        let records = Arc::new(MockRecords {
            return_none: true,
            ..MockRecords::ok()
        });
        let outcome = pipeline(MockFiles { fail_kinds: vec![] }, records)
            .submit(&store)
            .await;

        assert!(!outcome.success);
        assert_eq!(store.read().await.personal.first_name, "Asha");
    }

    #[tokio::test]
    async fn failed_upload_degrades_to_null_and_submission_succeeds() {
        // One education document whose upload fails: the record is still
        // created, that document is null in the payload, everything else
        // persists.
        let mut initial = filled_store();
        let id = initial.add_education();
        initial.update_education(id, EducationPatch {
            degree: Some("B.E.".into()),
            institution: Some("COEP".into()),
            document: Some(FileAttachment::new("degree.pdf", "application/pdf", vec![1, 2])),
            ..Default::default()
        });
        initial.update_bank(BankPatch {
            proof: Some(FileAttachment::new("cheque.png", "image/png", vec![3])),
            ..Default::default()
        });

        let store = RwLock::new(initial);
        let records = Arc::new(MockRecords::ok());
        let outcome = pipeline(
            MockFiles {
                fail_kinds: vec![UploadKind::EducationDocument],
            },
            Arc::clone(&records),
        )
        .submit(&store)
        .await;

        assert!(outcome.success);
        assert!(outcome.uploads.iter().any(|r| matches!(
            r.result,
            UploadResult::SoftFailed { .. }
        )));

        let payload = records.seen.lock().unwrap().clone().unwrap();
        assert!(payload["education"][0]["documentUrl"].is_null());
        assert_eq!(
            payload["bank"]["proofUrl"],
            "https://files.test/bank_proof/cheque.png"
        );
        assert_eq!(payload["personal"]["firstName"], "Asha");
    }

    #[tokio::test]
    async fn uploads_resolve_before_payload_assembly() {
        let mut initial = filled_store();
        initial.update_personal(PersonalPatch {
            profile_photo: Some(FileAttachment::new("me.jpg", "image/jpeg", vec![9])),
            ..Default::default()
        });

        let store = RwLock::new(initial);
        let records = Arc::new(MockRecords::ok());
        pipeline(MockFiles { fail_kinds: vec![] }, Arc::clone(&records))
            .submit(&store)
            .await;

        let payload = records.seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            payload["personal"]["profilePhotoUrl"],
            "https://files.test/profile_photo/me.jpg"
        );
    }
}
