//! Section data models for the onboarding intake store.
//!
//! Every top-level slice of wizard state is a section struct here, together
//! with the patch types the store merges into them. Sections never own each
//! other; the root `IntakeStore` is the sole owner.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Shared field types ──────────────────────────────────────────────

/// A text field with an independently tracked verification flag.
///
/// Verification is set only by the engine (e.g. a successful pincode
/// lookup). Any manual edit that changes the value clears the flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifiedField {
    pub value: String,
    pub verified: bool,
}

impl VerifiedField {
    /// Manual edit: store the value, clearing `verified` if it changed.
    pub fn set(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value != self.value {
            self.verified = false;
        }
        self.value = value;
    }

    /// Engine-driven write: store the value and mark it verified.
    pub fn set_verified(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.verified = true;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// An attached document or image.
///
/// Before submission the local bytes are present and `url` is unset; the
/// submission pipeline uploads pending attachments and flattens them to a
/// URL (or null on soft failure) in the wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Local file bytes, exclusively owned by the referencing section
    /// until uploaded. Never serialized into snapshots.
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes: data.len() as u64,
            data: Some(data),
            url: None,
        }
    }

    /// Whether this attachment still needs an upload.
    pub fn is_pending(&self) -> bool {
        self.data.is_some() && self.url.is_none()
    }
}

// ── Enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Fixed relation set for family members and GMC nominees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Spouse,
    Father,
    Mother,
    Son,
    Daughter,
    Brother,
    Sister,
    Other,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Spouse => "spouse",
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ── Organization ────────────────────────────────────────────────────

/// Employer assignment for this enrollment. All fields optional until set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSection {
    pub org_id: Option<Uuid>,
    pub org_name: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub default_salary: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationPatch {
    pub org_id: Option<Uuid>,
    pub org_name: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub default_salary: Option<Decimal>,
}

impl OrganizationSection {
    pub fn apply(&mut self, patch: OrganizationPatch) {
        if let Some(v) = patch.org_id {
            self.org_id = Some(v);
        }
        if let Some(v) = patch.org_name {
            self.org_name = Some(v);
        }
        if let Some(v) = patch.joining_date {
            self.joining_date = Some(v);
        }
        if let Some(v) = patch.designation {
            self.designation = Some(v);
        }
        if let Some(v) = patch.department {
            self.department = Some(v);
        }
        if let Some(v) = patch.default_salary {
            self.default_salary = Some(v);
        }
    }
}

// ── Personal ────────────────────────────────────────────────────────

/// Identity, contact, salary and UAN/PF details for the employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalSection {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub marital_status: MaritalStatus,
    pub mobile: String,
    pub mobile_verified: bool,
    pub emergency_contact_name: String,
    pub emergency_contact_mobile: String,
    pub salary: Decimal,
    pub has_uan: bool,
    pub uan_number: String,
    pub pf_number: String,
    pub profile_photo: Option<FileAttachment>,
    pub identity_proof: Option<FileAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonalPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub marital_status: Option<MaritalStatus>,
    pub mobile: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_mobile: Option<String>,
    pub salary: Option<Decimal>,
    pub has_uan: Option<bool>,
    pub uan_number: Option<String>,
    pub pf_number: Option<String>,
    pub profile_photo: Option<FileAttachment>,
    pub identity_proof: Option<FileAttachment>,
}

impl PersonalSection {
    pub fn apply(&mut self, patch: PersonalPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            // A changed email invalidates any prior verification.
            if v != self.email {
                self.email_verified = false;
            }
            self.email = v;
        }
        if let Some(v) = patch.dob {
            self.dob = Some(v);
        }
        if let Some(v) = patch.gender {
            self.gender = Some(v);
        }
        if let Some(v) = patch.marital_status {
            self.marital_status = v;
        }
        if let Some(v) = patch.mobile {
            if v != self.mobile {
                self.mobile_verified = false;
            }
            self.mobile = v;
        }
        if let Some(v) = patch.emergency_contact_name {
            self.emergency_contact_name = v;
        }
        if let Some(v) = patch.emergency_contact_mobile {
            self.emergency_contact_mobile = v;
        }
        if let Some(v) = patch.salary {
            self.salary = v;
        }
        if let Some(v) = patch.has_uan {
            self.has_uan = v;
        }
        if let Some(v) = patch.uan_number {
            self.uan_number = v;
        }
        if let Some(v) = patch.pf_number {
            self.pf_number = v;
        }
        if let Some(v) = patch.profile_photo {
            self.profile_photo = Some(v);
        }
        if let Some(v) = patch.identity_proof {
            self.identity_proof = Some(v);
        }
    }
}

// ── Address ─────────────────────────────────────────────────────────

/// One postal address; city/state/pincode carry verification flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: VerifiedField,
    pub state: VerifiedField,
    pub pincode: VerifiedField,
}

/// Present + permanent address and the mirror flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressSection {
    pub present: Address,
    pub permanent: Address,
    pub same_as_present: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressFieldsPatch {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl Address {
    pub fn apply(&mut self, patch: AddressFieldsPatch) {
        if let Some(v) = patch.line1 {
            self.line1 = v;
        }
        if let Some(v) = patch.line2 {
            self.line2 = v;
        }
        if let Some(v) = patch.city {
            self.city.set(v);
        }
        if let Some(v) = patch.state {
            self.state.set(v);
        }
        if let Some(v) = patch.pincode {
            self.pincode.set(v);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressPatch {
    pub present: Option<AddressFieldsPatch>,
    pub permanent: Option<AddressFieldsPatch>,
    pub same_as_present: Option<bool>,
}

impl AddressSection {
    /// Merge the patch. Mirroring of permanent onto present is the rule
    /// layer's job and runs after every address mutation.
    pub fn apply(&mut self, patch: AddressPatch) {
        if let Some(p) = patch.present {
            self.present.apply(p);
        }
        if let Some(p) = patch.permanent {
            self.permanent.apply(p);
        }
        if let Some(v) = patch.same_as_present {
            self.same_as_present = v;
        }
    }
}

// ── Education (list) ────────────────────────────────────────────────

/// One qualification entry. Ids are store-generated and unique within the
/// list; order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub id: u64,
    pub degree: String,
    pub institution: String,
    pub end_year: Option<i32>,
    pub document: Option<FileAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub end_year: Option<i32>,
    pub document: Option<FileAttachment>,
}

impl EducationRecord {
    pub fn apply(&mut self, patch: EducationPatch) {
        if let Some(v) = patch.degree {
            self.degree = v;
        }
        if let Some(v) = patch.institution {
            self.institution = v;
        }
        if let Some(v) = patch.end_year {
            self.end_year = Some(v);
        }
        if let Some(v) = patch.document {
            self.document = Some(v);
        }
    }
}

// ── Family (list) ───────────────────────────────────────────────────

/// One dependent/relative entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: u64,
    pub relation: Relation,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub dependent: bool,
}

impl FamilyMember {
    /// Defaults for a freshly added row.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            relation: Relation::Other,
            name: String::new(),
            dob: None,
            dependent: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FamilyMemberPatch {
    pub relation: Option<Relation>,
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub dependent: Option<bool>,
}

impl FamilyMember {
    pub fn apply(&mut self, patch: FamilyMemberPatch) {
        if let Some(v) = patch.relation {
            self.relation = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.dob {
            self.dob = Some(v);
        }
        if let Some(v) = patch.dependent {
            self.dependent = v;
        }
    }
}

// ── Bank ────────────────────────────────────────────────────────────

/// Payout account details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankSection {
    pub account_holder: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub branch_name: String,
    pub proof: Option<FileAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BankPatch {
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    pub confirm_account_number: Option<String>,
    pub ifsc: Option<String>,
    pub bank_name: Option<String>,
    pub branch_name: Option<String>,
    pub proof: Option<FileAttachment>,
}

impl BankSection {
    pub fn apply(&mut self, patch: BankPatch) {
        if let Some(v) = patch.account_holder {
            self.account_holder = v;
        }
        if let Some(v) = patch.account_number {
            self.account_number = v;
        }
        if let Some(v) = patch.confirm_account_number {
            self.confirm_account_number = v;
        }
        if let Some(v) = patch.ifsc {
            self.ifsc = v;
        }
        if let Some(v) = patch.bank_name {
            self.bank_name = v;
        }
        if let Some(v) = patch.branch_name {
            self.branch_name = v;
        }
        if let Some(v) = patch.proof {
            self.proof = Some(v);
        }
    }
}

// ── ESI ─────────────────────────────────────────────────────────────

/// Statutory insurance opt-in. The number is required only when opted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsiSection {
    pub has_esi: bool,
    pub esi_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EsiPatch {
    pub has_esi: Option<bool>,
    pub esi_number: Option<String>,
}

impl EsiSection {
    pub fn apply(&mut self, patch: EsiPatch) {
        if let Some(v) = patch.has_esi {
            self.has_esi = v;
        }
        if let Some(v) = patch.esi_number {
            self.esi_number = v;
        }
    }
}

// ── GMC ─────────────────────────────────────────────────────────────

/// Group medical cover opt-in. The whole section is gated on salary (see
/// `rules::derive`); `policy_amount_touched` records an explicit user
/// choice so the default derivation never stomps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GmcSection {
    pub opted_in: Option<bool>,
    pub opt_out_reason: String,
    pub policy_amount: Option<Decimal>,
    pub policy_amount_touched: bool,
    pub nominee_name: String,
    pub nominee_relation: Option<Relation>,
    pub has_alternate_insurance: bool,
    pub alternate_provider: String,
    pub alternate_policy_number: String,
    pub declaration_accepted: bool,
    pub policy_copy: Option<FileAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GmcPatch {
    pub opted_in: Option<bool>,
    pub opt_out_reason: Option<String>,
    pub policy_amount: Option<Decimal>,
    pub nominee_name: Option<String>,
    pub nominee_relation: Option<Relation>,
    pub has_alternate_insurance: Option<bool>,
    pub alternate_provider: Option<String>,
    pub alternate_policy_number: Option<String>,
    pub declaration_accepted: Option<bool>,
    pub policy_copy: Option<FileAttachment>,
}

impl GmcSection {
    pub fn apply(&mut self, patch: GmcPatch) {
        if let Some(v) = patch.opted_in {
            self.opted_in = Some(v);
        }
        if let Some(v) = patch.opt_out_reason {
            self.opt_out_reason = v;
        }
        if let Some(v) = patch.policy_amount {
            // An amount arriving through a patch is an explicit user choice.
            self.policy_amount = Some(v);
            self.policy_amount_touched = true;
        }
        if let Some(v) = patch.nominee_name {
            self.nominee_name = v;
        }
        if let Some(v) = patch.nominee_relation {
            self.nominee_relation = Some(v);
        }
        if let Some(v) = patch.has_alternate_insurance {
            self.has_alternate_insurance = v;
        }
        if let Some(v) = patch.alternate_provider {
            self.alternate_provider = v;
        }
        if let Some(v) = patch.alternate_policy_number {
            self.alternate_policy_number = v;
        }
        if let Some(v) = patch.declaration_accepted {
            self.declaration_accepted = v;
        }
        if let Some(v) = patch.policy_copy {
            self.policy_copy = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn verified_field_edit_clears_flag() {
        let mut f = VerifiedField::default();
        f.set_verified("Pune");
        assert!(f.verified);

        f.set("Mumbai");
        assert!(!f.verified);
        assert_eq!(f.value, "Mumbai");
    }

    #[test]
    fn verified_field_same_value_keeps_flag() {
        let mut f = VerifiedField::default();
        f.set_verified("411045");
        f.set("411045");
        assert!(f.verified, "re-entering the same value is not an edit");
    }

    #[test]
    fn attachment_pending_until_uploaded() {
        let mut file = FileAttachment::new("degree.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(file.is_pending());
        assert_eq!(file.size_bytes, 3);

        file.url = Some("https://files.example.com/degree.pdf".into());
        assert!(!file.is_pending());
    }

    #[test]
    fn personal_patch_merges_only_supplied_fields() {
        let mut p = PersonalSection {
            first_name: "Asha".into(),
            mobile: "9812345678".into(),
            salary: dec!(30000),
            ..Default::default()
        };

        p.apply(PersonalPatch {
            salary: Some(dec!(50000)),
            ..Default::default()
        });

        assert_eq!(p.salary, dec!(50000));
        assert_eq!(p.first_name, "Asha");
        assert_eq!(p.mobile, "9812345678");
    }

    #[test]
    fn personal_mobile_edit_clears_verification() {
        let mut p = PersonalSection {
            mobile: "9812345678".into(),
            mobile_verified: true,
            ..Default::default()
        };

        p.apply(PersonalPatch {
            mobile: Some("9898989898".into()),
            ..Default::default()
        });
        assert!(!p.mobile_verified);
    }

    #[test]
    fn gmc_patch_amount_marks_touched() {
        let mut gmc = GmcSection::default();
        assert!(!gmc.policy_amount_touched);

        gmc.apply(GmcPatch {
            policy_amount: Some(dec!(400000)),
            ..Default::default()
        });
        assert!(gmc.policy_amount_touched);
        assert_eq!(gmc.policy_amount, Some(dec!(400000)));
    }

    #[test]
    fn address_patch_edits_through_verified_fields() {
        let mut section = AddressSection::default();
        section.present.city.set_verified("Pune");

        section.apply(AddressPatch {
            present: Some(AddressFieldsPatch {
                city: Some("Nashik".into()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(section.present.city.value, "Nashik");
        assert!(!section.present.city.verified);
    }

    #[test]
    fn relation_display_matches_serde() {
        let relations = [
            Relation::Spouse,
            Relation::Father,
            Relation::Mother,
            Relation::Son,
            Relation::Daughter,
            Relation::Brother,
            Relation::Sister,
            Relation::Other,
        ];
        for relation in relations {
            let display = format!("{relation}");
            let json = serde_json::to_string(&relation).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
