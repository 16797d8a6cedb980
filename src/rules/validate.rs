//! Per-section validators.
//!
//! Each validator is a pure function of the store snapshot (plus config
//! where a gate applies) and returns the collected `FieldErrors` for that
//! step. Empty result = the step may advance.

use rust_decimal::Decimal;

use crate::config::IntakeConfig;
use crate::store::{
    Address, AddressSection, BankSection, EducationRecord, EsiSection, FamilyMember, GmcSection,
    OrganizationSection, PersonalSection,
};

use super::derive::gmc_applicable;
use super::{FieldErrors, FieldPatterns};

pub fn validate_personal(personal: &PersonalSection, patterns: &FieldPatterns) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if personal.first_name.trim().is_empty() {
        errors.push("first_name", "First name is required");
    }
    if personal.mobile.is_empty() {
        errors.push("mobile", "Mobile number is required");
    } else if !patterns.mobile.is_match(&personal.mobile) {
        errors.push("mobile", "Enter a valid 10-digit mobile number");
    }
    if !personal.emergency_contact_mobile.is_empty()
        && !patterns.mobile.is_match(&personal.emergency_contact_mobile)
    {
        errors.push(
            "emergency_contact_mobile",
            "Enter a valid 10-digit mobile number",
        );
    }
    if !personal.email.is_empty() && !personal.email.contains('@') {
        errors.push("email", "Enter a valid email address");
    }
    if personal.salary < Decimal::ZERO {
        errors.push("salary", "Salary cannot be negative");
    }

    errors
}

fn validate_one_address(address: &Address, prefix: &str, patterns: &FieldPatterns, errors: &mut FieldErrors) {
    if address.line1.trim().is_empty() {
        errors.push(&format!("{prefix}.line1"), "Address line is required");
    }
    if address.city.is_empty() {
        errors.push(&format!("{prefix}.city"), "City is required");
    }
    if address.state.is_empty() {
        errors.push(&format!("{prefix}.state"), "State is required");
    }
    if address.pincode.is_empty() {
        errors.push(&format!("{prefix}.pincode"), "Pincode is required");
    } else if !patterns.pincode.is_match(&address.pincode.value) {
        errors.push(&format!("{prefix}.pincode"), "Enter a valid 6-digit pincode");
    }
}

pub fn validate_address(address: &AddressSection, patterns: &FieldPatterns) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validate_one_address(&address.present, "present", patterns, &mut errors);
    // When mirrored, permanent is forced equal to present, so re-checking
    // it would only duplicate the messages.
    if !address.same_as_present {
        validate_one_address(&address.permanent, "permanent", patterns, &mut errors);
    }
    errors
}

pub fn validate_organization(organization: &OrganizationSection) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if organization.org_name.as_deref().unwrap_or("").trim().is_empty() {
        errors.push("org_name", "Organization is required");
    }
    if organization.joining_date.is_none() {
        errors.push("joining_date", "Joining date is required");
    }
    errors
}

pub fn validate_family(family: &[FamilyMember]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for member in family {
        if member.name.trim().is_empty() {
            errors.push(&format!("family.{}.name", member.id), "Name is required");
        }
    }
    errors
}

pub fn validate_education(education: &[EducationRecord]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for record in education {
        if record.degree.trim().is_empty() {
            errors.push(
                &format!("education.{}.degree", record.id),
                "Degree is required",
            );
        }
        if record.institution.trim().is_empty() {
            errors.push(
                &format!("education.{}.institution", record.id),
                "Institution is required",
            );
        }
    }
    errors
}

pub fn validate_bank(bank: &BankSection, patterns: &FieldPatterns) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if bank.account_holder.trim().is_empty() {
        errors.push("account_holder", "Account holder name is required");
    }
    if bank.account_number.is_empty() {
        errors.push("account_number", "Account number is required");
    }
    if bank.confirm_account_number != bank.account_number {
        errors.push("confirm_account_number", "Account numbers do not match");
    }
    if bank.ifsc.is_empty() {
        errors.push("ifsc", "IFSC code is required");
    } else if !patterns.ifsc.is_match(&bank.ifsc) {
        errors.push("ifsc", "Invalid IFSC code");
    }

    errors
}

/// UAN step: the UAN/PF sub-fields live on the personal section but are
/// collected on their own wizard step.
pub fn validate_uan(personal: &PersonalSection, patterns: &FieldPatterns) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if personal.has_uan && !patterns.uan.is_match(&personal.uan_number) {
        errors.push("uan_number", "Enter a valid 12-digit UAN");
    }
    errors
}

pub fn validate_esi(esi: &EsiSection, patterns: &FieldPatterns) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if esi.has_esi && !patterns.esi.is_match(&esi.esi_number) {
        errors.push("esi_number", "Enter a valid 17-digit ESI number");
    }
    errors
}

/// GMC step. Inapplicable (salary at or below the threshold) validates
/// clean — the step is skipped entirely.
pub fn validate_gmc(
    gmc: &GmcSection,
    personal: &PersonalSection,
    config: &IntakeConfig,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !gmc_applicable(personal.salary, config) {
        return errors;
    }

    match gmc.opted_in {
        None => {
            errors.push("opted_in", "Choose whether to opt in to the group medical cover");
        }
        Some(true) => {
            if gmc.nominee_name.trim().is_empty() {
                errors.push("nominee_name", "Nominee name is required");
            }
            if gmc.nominee_relation.is_none() {
                errors.push("nominee_relation", "Nominee relation is required");
            }
            if gmc.policy_amount.is_none() {
                errors.push("policy_amount", "Policy amount is required");
            }
            if !gmc.declaration_accepted {
                errors.push("declaration_accepted", "Declaration must be accepted");
            }
        }
        Some(false) => {
            if gmc.opt_out_reason.trim().is_empty() {
                errors.push("opt_out_reason", "Opt-out reason is required");
            }
            if gmc.has_alternate_insurance {
                if gmc.alternate_provider.trim().is_empty() {
                    errors.push("alternate_provider", "Insurance provider is required");
                }
                if gmc.alternate_policy_number.trim().is_empty() {
                    errors.push("alternate_policy_number", "Policy number is required");
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GmcPatch, PersonalPatch, Relation};
    use rust_decimal_macros::dec;

    fn patterns() -> FieldPatterns {
        FieldPatterns::compile()
    }

    fn valid_personal() -> PersonalSection {
        let mut p = PersonalSection::default();
        p.apply(PersonalPatch {
            first_name: Some("Asha".into()),
            last_name: Some("Kulkarni".into()),
            mobile: Some("9812345678".into()),
            salary: Some(dec!(30000)),
            ..Default::default()
        });
        p
    }

    #[test]
    fn personal_accepts_valid_section() {
        assert!(validate_personal(&valid_personal(), &patterns()).is_empty());
    }

    #[test]
    fn personal_rejects_bad_mobile() {
        let mut p = valid_personal();
        p.mobile = "12345".into();
        let errors = validate_personal(&p, &patterns());
        assert!(errors.get("mobile").is_some());
    }

    #[test]
    fn personal_rejects_bad_emergency_contact() {
        let mut p = valid_personal();
        p.emergency_contact_mobile = "0812345678".into();
        let errors = validate_personal(&p, &patterns());
        assert!(errors.get("emergency_contact_mobile").is_some());
    }

    #[test]
    fn personal_rejects_negative_salary() {
        let mut p = valid_personal();
        p.salary = dec!(-1);
        assert!(validate_personal(&p, &patterns()).get("salary").is_some());
    }

    fn valid_address() -> AddressSection {
        let mut section = AddressSection::default();
        section.present.line1 = "12 MG Road".into();
        section.present.city.set("Pune");
        section.present.state.set("Maharashtra");
        section.present.pincode.set("411045");
        section.same_as_present = true;
        section.permanent = section.present.clone();
        section
    }

    #[test]
    fn address_accepts_valid_mirrored_section() {
        assert!(validate_address(&valid_address(), &patterns()).is_empty());
    }

    #[test]
    fn address_checks_permanent_when_not_mirrored() {
        let mut section = valid_address();
        section.same_as_present = false;
        section.permanent = Address::default();
        let errors = validate_address(&section, &patterns());
        assert!(errors.get("permanent.line1").is_some());
        assert!(errors.get("permanent.pincode").is_some());
    }

    #[test]
    fn address_rejects_leading_zero_pincode() {
        let mut section = valid_address();
        section.present.pincode.set("011045");
        let errors = validate_address(&section, &patterns());
        assert_eq!(
            errors.get("present.pincode"),
            Some("Enter a valid 6-digit pincode")
        );
    }

    #[test]
    fn bank_requires_matching_confirmation() {
        let mut bank = BankSection::default();
        bank.account_holder = "Asha Kulkarni".into();
        bank.account_number = "001122334455".into();
        bank.confirm_account_number = "001122334456".into();
        bank.ifsc = "HDFC0001234".into();

        let errors = validate_bank(&bank, &patterns());
        assert_eq!(
            errors.get("confirm_account_number"),
            Some("Account numbers do not match")
        );

        bank.confirm_account_number = bank.account_number.clone();
        assert!(validate_bank(&bank, &patterns()).is_empty());
    }

    #[test]
    fn bank_rejects_bad_ifsc() {
        let mut bank = BankSection::default();
        bank.account_holder = "A".into();
        bank.account_number = "1".into();
        bank.confirm_account_number = "1".into();
        bank.ifsc = "HDFC1001234".into();
        assert_eq!(validate_bank(&bank, &patterns()).get("ifsc"), Some("Invalid IFSC code"));
    }

    #[test]
    fn uan_required_only_when_flagged() {
        let mut p = valid_personal();
        assert!(validate_uan(&p, &patterns()).is_empty());

        p.has_uan = true;
        assert!(validate_uan(&p, &patterns()).get("uan_number").is_some());

        p.uan_number = "100200300400".into();
        assert!(validate_uan(&p, &patterns()).is_empty());
    }

    #[test]
    fn esi_number_required_when_opted_in() {
        let mut esi = EsiSection::default();
        assert!(validate_esi(&esi, &patterns()).is_empty());

        esi.has_esi = true;
        assert!(validate_esi(&esi, &patterns()).get("esi_number").is_some());

        esi.esi_number = "31001234560000101".into();
        assert!(validate_esi(&esi, &patterns()).is_empty());
    }

    #[test]
    fn gmc_skipped_below_threshold() {
        let config = IntakeConfig::default();
        let mut personal = valid_personal();
        personal.salary = config.gmc_salary_threshold; // exactly at: inapplicable
        let gmc = GmcSection::default();
        assert!(validate_gmc(&gmc, &personal, &config).is_empty());
    }

    #[test]
    fn gmc_opt_in_requires_nominee() {
        // Salary above threshold makes the section applicable; opting in
        // without a nominee fails with the nominee-name field error.
        let config = IntakeConfig {
            gmc_salary_threshold: dec!(40000),
            ..Default::default()
        };
        let mut personal = valid_personal();
        personal.salary = dec!(50000);

        let mut gmc = GmcSection::default();
        gmc.apply(GmcPatch {
            opted_in: Some(true),
            policy_amount: Some(dec!(300000)),
            ..Default::default()
        });
        gmc.declaration_accepted = true;

        let errors = validate_gmc(&gmc, &personal, &config);
        assert_eq!(errors.get("nominee_name"), Some("Nominee name is required"));
        assert!(errors.get("nominee_relation").is_some());

        gmc.nominee_name = "Ravi Kulkarni".into();
        gmc.nominee_relation = Some(Relation::Spouse);
        assert!(validate_gmc(&gmc, &personal, &config).is_empty());
    }

    #[test]
    fn gmc_opt_out_requires_reason() {
        let config = IntakeConfig::default();
        let mut personal = valid_personal();
        personal.salary = dec!(50000);

        let mut gmc = GmcSection::default();
        gmc.opted_in = Some(false);
        let errors = validate_gmc(&gmc, &personal, &config);
        assert!(errors.get("opt_out_reason").is_some());

        gmc.opt_out_reason = "Covered by spouse's corporate policy".into();
        assert!(validate_gmc(&gmc, &personal, &config).is_empty());
    }

    #[test]
    fn gmc_opt_out_with_alternate_needs_details() {
        let config = IntakeConfig::default();
        let mut personal = valid_personal();
        personal.salary = dec!(50000);

        let mut gmc = GmcSection::default();
        gmc.opted_in = Some(false);
        gmc.opt_out_reason = "Have my own policy".into();
        gmc.has_alternate_insurance = true;

        let errors = validate_gmc(&gmc, &personal, &config);
        assert!(errors.get("alternate_provider").is_some());
        assert!(errors.get("alternate_policy_number").is_some());
    }
}
