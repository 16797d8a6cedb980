//! Section state store — the single authoritative home of wizard data.

pub mod sections;
pub mod state;

pub use sections::{
    Address, AddressFieldsPatch, AddressPatch, AddressSection, BankPatch, BankSection,
    EducationPatch, EducationRecord, EsiPatch, EsiSection, FamilyMember, FamilyMemberPatch,
    FileAttachment, Gender, GmcPatch, GmcSection, MaritalStatus, OrganizationPatch,
    OrganizationSection, PersonalPatch, PersonalSection, Relation, VerifiedField,
};
pub use state::IntakeStore;
