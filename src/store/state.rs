//! The root intake store — single source of truth for all wizard state.
//!
//! Mutation is always a shallow merge of supplied fields into the named
//! section, except the list sections which expose explicit add/update/
//! remove operations. No validation happens here; that is the rule
//! layer's job.

use serde::Serialize;

use super::sections::{
    AddressPatch, AddressSection, BankPatch, BankSection, EducationPatch, EducationRecord,
    EsiPatch, EsiSection, FamilyMember, FamilyMemberPatch, GmcPatch, GmcSection,
    OrganizationPatch, OrganizationSection, PersonalPatch, PersonalSection,
};

/// All onboarding sections plus the list-item id generator.
///
/// Plain struct — the manager wraps it in `Arc<RwLock<_>>`, so every
/// instance is independent and tests construct their own.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntakeStore {
    pub organization: OrganizationSection,
    pub personal: PersonalSection,
    pub address: AddressSection,
    pub education: Vec<EducationRecord>,
    pub family: Vec<FamilyMember>,
    pub bank: BankSection,
    pub esi: EsiSection,
    pub gmc: GmcSection,
    /// Monotonic counter for list-item ids.
    #[serde(skip)]
    next_id: u64,
}

impl IntakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ── Section merges ──────────────────────────────────────────────

    pub fn update_organization(&mut self, patch: OrganizationPatch) {
        self.organization.apply(patch);
    }

    pub fn update_personal(&mut self, patch: PersonalPatch) {
        self.personal.apply(patch);
    }

    pub fn update_address(&mut self, patch: AddressPatch) {
        self.address.apply(patch);
    }

    pub fn update_bank(&mut self, patch: BankPatch) {
        self.bank.apply(patch);
    }

    pub fn update_esi(&mut self, patch: EsiPatch) {
        self.esi.apply(patch);
    }

    pub fn update_gmc(&mut self, patch: GmcPatch) {
        self.gmc.apply(patch);
    }

    // ── Education list ──────────────────────────────────────────────

    /// Append a new empty qualification row; returns its id.
    pub fn add_education(&mut self) -> u64 {
        let id = self.fresh_id();
        self.education.push(EducationRecord {
            id,
            ..Default::default()
        });
        id
    }

    /// Merge fields into the record with the given id. Unknown ids are a
    /// programming-contract violation and ignored.
    pub fn update_education(&mut self, id: u64, patch: EducationPatch) {
        if let Some(record) = self.education.iter_mut().find(|r| r.id == id) {
            record.apply(patch);
        }
    }

    pub fn remove_education(&mut self, id: u64) {
        if let Some(pos) = self.education.iter().position(|r| r.id == id) {
            self.education.remove(pos);
        }
    }

    // ── Family list ─────────────────────────────────────────────────

    /// Append a new family member row with defaults; returns its id.
    pub fn add_family_member(&mut self) -> u64 {
        let id = self.fresh_id();
        self.family.push(FamilyMember::with_id(id));
        id
    }

    pub fn update_family_member(&mut self, id: u64, patch: FamilyMemberPatch) {
        if let Some(member) = self.family.iter_mut().find(|m| m.id == id) {
            member.apply(patch);
        }
    }

    pub fn remove_family_member(&mut self, id: u64) {
        if let Some(pos) = self.family.iter().position(|m| m.id == id) {
            self.family.remove(pos);
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Restore every section to its initial value in one assignment.
    ///
    /// Runs under the store's single write lock, so readers observe either
    /// the old state or the fully reset one — never a half-reset mix. The
    /// id counter survives so ids stay unique across a reset.
    pub fn reset(&mut self) {
        *self = Self {
            next_id: self.next_id,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sections::Relation;
    use rust_decimal_macros::dec;

    #[test]
    fn update_merges_and_leaves_rest_untouched() {
        let mut store = IntakeStore::new();
        store.update_personal(PersonalPatch {
            first_name: Some("Asha".into()),
            mobile: Some("9812345678".into()),
            ..Default::default()
        });
        store.update_personal(PersonalPatch {
            salary: Some(dec!(45000)),
            ..Default::default()
        });

        assert_eq!(store.personal.first_name, "Asha");
        assert_eq!(store.personal.mobile, "9812345678");
        assert_eq!(store.personal.salary, dec!(45000));
    }

    #[test]
    fn reset_restores_initial_sections() {
        let mut store = IntakeStore::new();
        store.update_personal(PersonalPatch {
            first_name: Some("Asha".into()),
            salary: Some(dec!(45000)),
            ..Default::default()
        });
        store.update_bank(BankPatch {
            account_number: Some("000111222333".into()),
            ..Default::default()
        });
        store.add_education();
        store.add_family_member();

        store.reset();

        let initial = IntakeStore::new();
        assert_eq!(store.personal, initial.personal);
        assert_eq!(store.address, initial.address);
        assert_eq!(store.bank, initial.bank);
        assert_eq!(store.esi, initial.esi);
        assert_eq!(store.gmc, initial.gmc);
        assert!(store.education.is_empty());
        assert!(store.family.is_empty());
    }

    #[test]
    fn ids_stay_unique_across_reset() {
        let mut store = IntakeStore::new();
        let first = store.add_family_member();
        store.reset();
        let second = store.add_family_member();
        assert_ne!(first, second);
    }

    #[test]
    fn rapid_adds_never_collide() {
        let mut store = IntakeStore::new();
        let mut ids: Vec<u64> = (0..100).map(|_| store.add_education()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn update_unknown_list_id_is_noop() {
        let mut store = IntakeStore::new();
        let id = store.add_education();
        store.update_education(id + 999, EducationPatch {
            degree: Some("B.E.".into()),
            ..Default::default()
        });
        assert!(store.education[0].degree.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = IntakeStore::new();
        let id = store.add_family_member();
        store.remove_family_member(id);
        store.remove_family_member(id);
        assert!(store.family.is_empty());
    }

    #[test]
    fn remove_first_keeps_second_with_its_defaults() {
        // Scenario: add two members, remove the first; exactly the second
        // remains, untouched.
        let mut store = IntakeStore::new();
        let first = store.add_family_member();
        let second = store.add_family_member();

        store.update_family_member(first, FamilyMemberPatch {
            name: Some("Ravi".into()),
            relation: Some(Relation::Father),
            ..Default::default()
        });

        store.remove_family_member(first);

        assert_eq!(store.family.len(), 1);
        let remaining = &store.family[0];
        assert_eq!(remaining.id, second);
        assert!(remaining.name.is_empty());
        assert_eq!(remaining.relation, Relation::Other);
        assert!(!remaining.dependent);
    }

    #[test]
    fn education_order_is_insertion_order() {
        let mut store = IntakeStore::new();
        let a = store.add_education();
        let b = store.add_education();
        let c = store.add_education();
        let order: Vec<u64> = store.education.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![a, b, c]);
    }
}
