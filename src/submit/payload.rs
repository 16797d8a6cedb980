//! Wire payload — the backend's normalized record shape.
//!
//! One flat record per submission: client-generated id, lifecycle/sync
//! status strings, the organization sub-object, and one sub-object per
//! section, with every attachment flattened to a URL string or null.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::store::{
    Address, FileAttachment, Gender, IntakeStore, MaritalStatus, Relation,
};

/// Lifecycle status a freshly created record starts in.
pub const DEFAULT_STATUS: &str = "Draft";
/// Portal synchronization status a freshly created record starts in.
pub const DEFAULT_PORTAL_SYNC_STATUS: &str = "Pending";

fn url_of(file: &Option<FileAttachment>) -> Option<String> {
    file.as_ref().and_then(|f| f.url.clone())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentPayload {
    pub id: Uuid,
    pub user_id: String,
    pub status: String,
    pub portal_sync_status: String,
    pub organization: OrganizationPayload,
    pub personal: PersonalPayload,
    pub address: AddressPayload,
    pub family: Vec<FamilyMemberPayload>,
    pub education: Vec<EducationPayload>,
    pub bank: BankPayload,
    pub uan: UanPayload,
    pub esi: EsiPayload,
    pub gmc: GmcPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub org_id: Option<Uuid>,
    pub org_name: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub default_salary: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub marital_status: MaritalStatus,
    pub mobile: String,
    pub emergency_contact_name: String,
    pub emergency_contact_mobile: String,
    pub salary: Decimal,
    pub profile_photo_url: Option<String>,
    pub identity_proof_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddressPayload {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<&Address> for PostalAddressPayload {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.value.clone(),
            state: address.state.value.clone(),
            pincode: address.pincode.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub present: PostalAddressPayload,
    pub permanent: PostalAddressPayload,
    pub same_as_present: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberPayload {
    pub relation: Relation,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub dependent: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    pub degree: String,
    pub institution: String,
    pub end_year: Option<i32>,
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankPayload {
    pub account_holder: String,
    pub account_number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub branch_name: String,
    pub proof_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UanPayload {
    pub has_uan: bool,
    pub uan_number: String,
    pub pf_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsiPayload {
    pub has_esi: bool,
    pub esi_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmcPayload {
    pub opted_in: Option<bool>,
    pub opt_out_reason: String,
    pub policy_amount: Option<Decimal>,
    pub nominee_name: String,
    pub nominee_relation: Option<Relation>,
    pub has_alternate_insurance: bool,
    pub alternate_provider: String,
    pub alternate_policy_number: String,
    pub declaration_accepted: bool,
    pub policy_copy_url: Option<String>,
}

impl EnrollmentPayload {
    /// Assemble the wire record from a store snapshot.
    ///
    /// The snapshot is expected to already carry resolved upload URLs;
    /// attachments that never uploaded flatten to null.
    pub fn from_snapshot(store: &IntakeStore, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            status: DEFAULT_STATUS.to_string(),
            portal_sync_status: DEFAULT_PORTAL_SYNC_STATUS.to_string(),
            organization: OrganizationPayload {
                org_id: store.organization.org_id,
                org_name: store.organization.org_name.clone(),
                joining_date: store.organization.joining_date,
                designation: store.organization.designation.clone(),
                department: store.organization.department.clone(),
                default_salary: store.organization.default_salary,
            },
            personal: PersonalPayload {
                first_name: store.personal.first_name.clone(),
                last_name: store.personal.last_name.clone(),
                email: store.personal.email.clone(),
                dob: store.personal.dob,
                gender: store.personal.gender,
                marital_status: store.personal.marital_status,
                mobile: store.personal.mobile.clone(),
                emergency_contact_name: store.personal.emergency_contact_name.clone(),
                emergency_contact_mobile: store.personal.emergency_contact_mobile.clone(),
                salary: store.personal.salary,
                profile_photo_url: url_of(&store.personal.profile_photo),
                identity_proof_url: url_of(&store.personal.identity_proof),
            },
            address: AddressPayload {
                present: (&store.address.present).into(),
                permanent: (&store.address.permanent).into(),
                same_as_present: store.address.same_as_present,
            },
            family: store
                .family
                .iter()
                .map(|m| FamilyMemberPayload {
                    relation: m.relation,
                    name: m.name.clone(),
                    dob: m.dob,
                    dependent: m.dependent,
                })
                .collect(),
            education: store
                .education
                .iter()
                .map(|r| EducationPayload {
                    degree: r.degree.clone(),
                    institution: r.institution.clone(),
                    end_year: r.end_year,
                    document_url: url_of(&r.document),
                })
                .collect(),
            bank: BankPayload {
                account_holder: store.bank.account_holder.clone(),
                account_number: store.bank.account_number.clone(),
                ifsc: store.bank.ifsc.clone(),
                bank_name: store.bank.bank_name.clone(),
                branch_name: store.bank.branch_name.clone(),
                proof_url: url_of(&store.bank.proof),
            },
            uan: UanPayload {
                has_uan: store.personal.has_uan,
                uan_number: store.personal.uan_number.clone(),
                pf_number: store.personal.pf_number.clone(),
            },
            esi: EsiPayload {
                has_esi: store.esi.has_esi,
                esi_number: store.esi.esi_number.clone(),
            },
            gmc: GmcPayload {
                opted_in: store.gmc.opted_in,
                opt_out_reason: store.gmc.opt_out_reason.clone(),
                policy_amount: store.gmc.policy_amount,
                nominee_name: store.gmc.nominee_name.clone(),
                nominee_relation: store.gmc.nominee_relation,
                has_alternate_insurance: store.gmc.has_alternate_insurance,
                alternate_provider: store.gmc.alternate_provider.clone(),
                alternate_policy_number: store.gmc.alternate_policy_number.clone(),
                declaration_accepted: store.gmc.declaration_accepted,
                policy_copy_url: url_of(&store.gmc.policy_copy),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BankPatch, EducationPatch, PersonalPatch};
    use rust_decimal_macros::dec;

    fn filled_store() -> IntakeStore {
        let mut store = IntakeStore::new();
        store.update_personal(PersonalPatch {
            first_name: Some("Asha".into()),
            last_name: Some("Kulkarni".into()),
            mobile: Some("9812345678".into()),
            salary: Some(dec!(50000)),
            has_uan: Some(true),
            uan_number: Some("100200300400".into()),
            ..Default::default()
        });
        store.update_bank(BankPatch {
            account_holder: Some("Asha Kulkarni".into()),
            account_number: Some("001122334455".into()),
            confirm_account_number: Some("001122334455".into()),
            ifsc: Some("HDFC0001234".into()),
            ..Default::default()
        });
        store
    }

    #[test]
    fn payload_carries_default_statuses() {
        let payload = EnrollmentPayload::from_snapshot(&filled_store(), "user-1");
        assert_eq!(payload.status, "Draft");
        assert_eq!(payload.portal_sync_status, "Pending");
        assert_eq!(payload.user_id, "user-1");
    }

    #[test]
    fn uan_sub_object_comes_from_personal_section() {
        let payload = EnrollmentPayload::from_snapshot(&filled_store(), "user-1");
        assert!(payload.uan.has_uan);
        assert_eq!(payload.uan.uan_number, "100200300400");
    }

    #[test]
    fn attachments_flatten_to_url_or_null() {
        let mut store = filled_store();
        let id = store.add_education();
        store.update_education(id, EducationPatch {
            degree: Some("B.E.".into()),
            institution: Some("COEP".into()),
            document: Some(FileAttachment::new("degree.pdf", "application/pdf", vec![1])),
            ..Default::default()
        });

        // One attachment resolved, one never uploaded.
        store.education[0].document.as_mut().unwrap().url =
            Some("https://files.example.com/degree.pdf".into());
        store.update_bank(BankPatch {
            proof: Some(FileAttachment::new("cheque.png", "image/png", vec![2])),
            ..Default::default()
        });

        let payload = EnrollmentPayload::from_snapshot(&store, "user-1");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json["education"][0]["documentUrl"],
            "https://files.example.com/degree.pdf"
        );
        assert!(json["bank"]["proofUrl"].is_null());
        assert!(json["personal"]["profilePhotoUrl"].is_null());
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let payload = EnrollmentPayload::from_snapshot(&filled_store(), "user-1");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("portalSyncStatus").is_some());
        assert!(json["personal"].get("firstName").is_some());
        assert!(json["uan"].get("hasUan").is_some());
    }

    #[test]
    fn each_submission_gets_a_fresh_id() {
        let store = filled_store();
        let a = EnrollmentPayload::from_snapshot(&store, "user-1");
        let b = EnrollmentPayload::from_snapshot(&store, "user-1");
        assert_ne!(a.id, b.id);
    }
}
