//! Configuration types.

use rust_decimal::Decimal;

/// Intake engine configuration.
///
/// Thresholds and defaults that the cross-field rules read. Injected into
/// the manager at construction so tests can vary them per instance.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Monthly salary above which (strictly) the group-medical-cover
    /// section applies. At or below the threshold the section is skipped.
    pub gmc_salary_threshold: Decimal,
    /// Default GMC policy amount for married employees.
    pub gmc_default_policy_married: Decimal,
    /// Default GMC policy amount for unmarried employees.
    pub gmc_default_policy_single: Decimal,
    /// Whether a valid-looking present-address pincode triggers the async
    /// city/state lookup.
    pub verify_pincodes: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            gmc_salary_threshold: Decimal::new(21_000, 0),
            gmc_default_policy_married: Decimal::new(500_000, 0),
            gmc_default_policy_single: Decimal::new(300_000, 0),
            verify_pincodes: true,
        }
    }
}
