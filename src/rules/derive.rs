//! Derived-state rules — reactions to sibling-field changes.
//!
//! These run after every relevant store mutation, so the store snapshot is
//! always consistent with the rules when a validator or the submission
//! pipeline reads it.

use rust_decimal::Decimal;

use crate::config::IntakeConfig;
use crate::store::{AddressSection, GmcSection, MaritalStatus};

/// Force the permanent address equal to the present one while the mirror
/// flag is set. Toggling the flag off leaves the last-mirrored values in
/// place until the user edits them.
pub fn mirror_permanent_address(address: &mut AddressSection) {
    if address.same_as_present {
        address.permanent = address.present.clone();
    }
}

/// The group-medical-cover section applies only strictly above the salary
/// threshold; a salary exactly at the threshold is inapplicable.
pub fn gmc_applicable(salary: Decimal, config: &IntakeConfig) -> bool {
    salary > config.gmc_salary_threshold
}

/// Configured default policy amount for a marital status.
pub fn gmc_default_policy(status: MaritalStatus, config: &IntakeConfig) -> Decimal {
    match status {
        MaritalStatus::Married => config.gmc_default_policy_married,
        MaritalStatus::Single => config.gmc_default_policy_single,
    }
}

/// Recompute the GMC policy amount after applicability, marital status,
/// or salary changed.
///
/// Closing the gate clears any selection (and the touch flag, so a later
/// re-opening re-derives cleanly). While the gate is open the default for
/// the current marital status is applied unless the user explicitly chose
/// an amount.
pub fn apply_gmc_policy_rules(
    gmc: &mut GmcSection,
    salary: Decimal,
    marital_status: MaritalStatus,
    config: &IntakeConfig,
) {
    if !gmc_applicable(salary, config) {
        gmc.policy_amount = None;
        gmc.policy_amount_touched = false;
        return;
    }
    if !gmc.policy_amount_touched {
        gmc.policy_amount = Some(gmc_default_policy(marital_status, config));
    }
}
