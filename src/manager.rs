//! IntakeManager — coordinates the section store, cross-field rules, step
//! controller, and submission pipeline.
//!
//! The manager owns the shared store behind a single `RwLock`, applies the
//! derived-state rules after every relevant mutation, and is the only
//! entry point the host wizard (or the REST surface) talks to.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::IntakeConfig;
use crate::rules::derive::{apply_gmc_policy_rules, gmc_applicable, mirror_permanent_address};
use crate::rules::{FieldErrors, FieldPatterns};
use crate::services::{FileStore, PincodeLookup, RecordService};
use crate::steps::{BackNav, StepController, StepId};
use crate::store::{
    AddressPatch, BankPatch, EducationPatch, EsiPatch, FamilyMemberPatch, GmcPatch, IntakeStore,
    OrganizationPatch, PersonalPatch,
};
use crate::submit::{SubmissionPipeline, SubmitOutcome};

/// Result of committing the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAdvance {
    /// Validation passed and the wizard moved to this step.
    MovedTo(StepId),
    /// Validation passed on the final (review) step; the host should now
    /// trigger submission — leaving the wizard is not a step transition.
    AtReview,
}

/// Result of a pincode verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PincodeVerification {
    /// City and state were overwritten and marked verified.
    Verified { city: String, state: String },
    /// Verification disabled or the pincode does not look valid yet; no
    /// lookup was attempted and nothing changed.
    Skipped,
}

/// Snapshot of wizard progress for the host shell.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeStatus {
    pub current_step: StepId,
    pub is_last_step: bool,
    pub gmc_applicable: bool,
}

/// Coordinates all engine components behind one handle.
pub struct IntakeManager {
    store: Arc<RwLock<IntakeStore>>,
    controller: RwLock<StepController>,
    config: IntakeConfig,
    patterns: FieldPatterns,
    pincodes: Arc<dyn PincodeLookup>,
    pipeline: SubmissionPipeline,
}

impl IntakeManager {
    pub fn new(
        config: IntakeConfig,
        pincodes: Arc<dyn PincodeLookup>,
        files: Arc<dyn FileStore>,
        records: Arc<dyn RecordService>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(IntakeStore::new())),
            controller: RwLock::new(StepController::new()),
            config,
            patterns: FieldPatterns::compile(),
            pincodes,
            pipeline: SubmissionPipeline::new(files, records, user_id),
        }
    }

    /// Clone of the full store snapshot (review step, REST surface).
    pub async fn snapshot(&self) -> IntakeStore {
        self.store.read().await.clone()
    }

    pub async fn status(&self) -> IntakeStatus {
        let controller = self.controller.read().await;
        IntakeStatus {
            current_step: controller.current(),
            is_last_step: controller.is_last(),
            gmc_applicable: self.gmc_gate_open().await,
        }
    }

    async fn gmc_gate_open(&self) -> bool {
        let store = self.store.read().await;
        gmc_applicable(store.personal.salary, &self.config)
    }

    // ── Section updates ─────────────────────────────────────────────
    //
    // Each update merges the patch and then re-applies the derived rules
    // that depend on the touched fields, inside the same write lock.

    pub async fn update_organization(&self, patch: OrganizationPatch) {
        self.store.write().await.update_organization(patch);
    }

    pub async fn update_personal(&self, patch: PersonalPatch) {
        let mut store = self.store.write().await;
        store.update_personal(patch);
        let salary = store.personal.salary;
        let marital = store.personal.marital_status;
        apply_gmc_policy_rules(&mut store.gmc, salary, marital, &self.config);
    }

    pub async fn update_address(&self, patch: AddressPatch) {
        let mut store = self.store.write().await;
        store.update_address(patch);
        mirror_permanent_address(&mut store.address);
    }

    pub async fn update_bank(&self, patch: BankPatch) {
        self.store.write().await.update_bank(patch);
    }

    pub async fn update_esi(&self, patch: EsiPatch) {
        self.store.write().await.update_esi(patch);
    }

    pub async fn update_gmc(&self, patch: GmcPatch) {
        let mut store = self.store.write().await;
        store.update_gmc(patch);
        let salary = store.personal.salary;
        let marital = store.personal.marital_status;
        apply_gmc_policy_rules(&mut store.gmc, salary, marital, &self.config);
    }

    pub async fn add_education(&self) -> u64 {
        self.store.write().await.add_education()
    }

    pub async fn update_education(&self, id: u64, patch: EducationPatch) {
        self.store.write().await.update_education(id, patch);
    }

    pub async fn remove_education(&self, id: u64) {
        self.store.write().await.remove_education(id);
    }

    pub async fn add_family_member(&self) -> u64 {
        self.store.write().await.add_family_member()
    }

    pub async fn update_family_member(&self, id: u64, patch: FamilyMemberPatch) {
        self.store.write().await.update_family_member(id, patch);
    }

    pub async fn remove_family_member(&self, id: u64) {
        self.store.write().await.remove_family_member(id);
    }

    // ── Pincode verification ────────────────────────────────────────

    /// Resolve the present-address pincode to city/state.
    ///
    /// Attempted only when verification is enabled and the pincode already
    /// matches the 6-digit format. A lookup failure maps to one inline
    /// field error; the address fields stay unchanged and unverified.
    pub async fn verify_present_pincode(&self) -> Result<PincodeVerification, FieldErrors> {
        if !self.config.verify_pincodes {
            return Ok(PincodeVerification::Skipped);
        }
        let pincode = {
            let store = self.store.read().await;
            store.address.present.pincode.value.clone()
        };
        if !self.patterns.pincode.is_match(&pincode) {
            return Ok(PincodeVerification::Skipped);
        }

        match self.pincodes.lookup(&pincode).await {
            Ok(info) => {
                let mut store = self.store.write().await;
                store.address.present.city.set_verified(&info.city);
                store.address.present.state.set_verified(&info.state);
                store.address.present.pincode.set_verified(&pincode);
                mirror_permanent_address(&mut store.address);
                Ok(PincodeVerification::Verified {
                    city: info.city,
                    state: info.state,
                })
            }
            Err(e) => {
                tracing::debug!(pincode = %pincode, error = %e, "Pincode lookup failed");
                let mut errors = FieldErrors::new();
                errors.push("present.pincode", "Invalid pincode");
                Err(errors)
            }
        }
    }

    // ── Step navigation ─────────────────────────────────────────────

    pub async fn current_step(&self) -> StepId {
        self.controller.read().await.current()
    }

    /// Validate the active step and, on success, advance.
    ///
    /// Every step validates through the same uniform path; there is no
    /// step that advances unvalidated.
    pub async fn commit_current_step(&self) -> Result<StepAdvance, FieldErrors> {
        let snapshot = self.snapshot().await;
        let gmc_open = gmc_applicable(snapshot.personal.salary, &self.config);

        let mut controller = self.controller.write().await;
        controller.current().validate(&snapshot, &self.config, &self.patterns)?;

        match controller.go_next(gmc_open) {
            Some(step) => Ok(StepAdvance::MovedTo(step)),
            None => Ok(StepAdvance::AtReview),
        }
    }

    /// Retreat one step; no validation is required to go backward.
    pub async fn go_previous(&self) -> BackNav {
        let gmc_open = self.gmc_gate_open().await;
        self.controller.write().await.go_previous(gmc_open)
    }

    /// Jump directly to a named step (review-step edit links).
    pub async fn go_to_step(&self, step: StepId) -> StepId {
        self.controller.write().await.go_to(step)
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Run the submission pipeline. On success the store has been reset;
    /// on failure it is untouched and the outcome carries the error.
    pub async fn submit(&self) -> SubmitOutcome {
        self.pipeline.submit(&self.store).await
    }
}
