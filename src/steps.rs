//! Wizard steps — the fixed ordered sequence and the controller that
//! tracks the active index.
//!
//! Every step exposes the same `validate` capability; steps with nothing
//! to check return Ok through the same path, so no step can advance
//! unvalidated.

use serde::{Deserialize, Serialize};

use crate::config::IntakeConfig;
use crate::rules::{validate, FieldErrors, FieldPatterns};
use crate::rules::derive::gmc_applicable;
use crate::store::IntakeStore;

/// The pages of the wizard, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Personal,
    Address,
    Organization,
    Family,
    Education,
    Bank,
    Uan,
    Esi,
    Gmc,
    Documents,
    Biometrics,
    Review,
}

impl StepId {
    /// The fixed linear step order.
    pub const SEQUENCE: [StepId; 12] = [
        Self::Personal,
        Self::Address,
        Self::Organization,
        Self::Family,
        Self::Education,
        Self::Bank,
        Self::Uan,
        Self::Esi,
        Self::Gmc,
        Self::Documents,
        Self::Biometrics,
        Self::Review,
    ];

    fn index(self) -> usize {
        Self::SEQUENCE.iter().position(|s| *s == self).unwrap()
    }

    /// Uniform per-step validation. Steps that collect nothing checkable
    /// (documents, biometrics, review) validate clean through the same
    /// path rather than bypassing it.
    pub fn validate(
        self,
        store: &IntakeStore,
        config: &IntakeConfig,
        patterns: &FieldPatterns,
    ) -> Result<(), FieldErrors> {
        let errors = match self {
            Self::Personal => validate::validate_personal(&store.personal, patterns),
            Self::Address => validate::validate_address(&store.address, patterns),
            Self::Organization => validate::validate_organization(&store.organization),
            Self::Family => validate::validate_family(&store.family),
            Self::Education => validate::validate_education(&store.education),
            Self::Bank => validate::validate_bank(&store.bank, patterns),
            Self::Uan => validate::validate_uan(&store.personal, patterns),
            Self::Esi => validate::validate_esi(&store.esi, patterns),
            Self::Gmc => validate::validate_gmc(&store.gmc, &store.personal, config),
            Self::Documents | Self::Biometrics | Self::Review => FieldErrors::new(),
        };
        errors.into_result()
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personal => "personal",
            Self::Address => "address",
            Self::Organization => "organization",
            Self::Family => "family",
            Self::Education => "education",
            Self::Bank => "bank",
            Self::Uan => "uan",
            Self::Esi => "esi",
            Self::Gmc => "gmc",
            Self::Documents => "documents",
            Self::Biometrics => "biometrics",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// Result of a backward navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackNav {
    MovedTo(StepId),
    /// Already at the first step — the host should leave the wizard.
    LeaveWizard,
}

/// Tracks the active step and translates navigation requests into index
/// changes. The controller never validates; the manager validates the
/// active step before asking it to advance.
#[derive(Debug, Clone)]
pub struct StepController {
    current: usize,
}

impl StepController {
    /// Start at the first step.
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Resume mid-flow at a named step (host persists position out of band).
    pub fn resume_at(step: StepId) -> Self {
        Self {
            current: step.index(),
        }
    }

    pub fn current(&self) -> StepId {
        StepId::SEQUENCE[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current == StepId::SEQUENCE.len() - 1
    }

    /// Advance one step, hopping over the GMC step while its gate is
    /// closed. Returns the new step, or None when already at the last.
    pub fn go_next(&mut self, gmc_open: bool) -> Option<StepId> {
        let mut next = self.current + 1;
        if next >= StepId::SEQUENCE.len() {
            return None;
        }
        if StepId::SEQUENCE[next] == StepId::Gmc && !gmc_open {
            next += 1;
        }
        self.current = next;
        Some(self.current())
    }

    /// Retreat one step (skipping a closed GMC step), or signal that the
    /// host should leave the wizard when already at the first step.
    pub fn go_previous(&mut self, gmc_open: bool) -> BackNav {
        if self.current == 0 {
            return BackNav::LeaveWizard;
        }
        let mut prev = self.current - 1;
        if StepId::SEQUENCE[prev] == StepId::Gmc && !gmc_open {
            if prev == 0 {
                return BackNav::LeaveWizard;
            }
            prev -= 1;
        }
        self.current = prev;
        BackNav::MovedTo(self.current())
    }

    /// Jump directly to a named step (review-step edit links).
    pub fn go_to(&mut self, step: StepId) -> StepId {
        self.current = step.index();
        self.current()
    }
}

impl Default for StepController {
    fn default() -> Self {
        Self::new()
    }
}
