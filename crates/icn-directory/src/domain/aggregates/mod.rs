//! Aggregates module

pub mod company;

pub use company::{
    Company, CompanyPatch, CompanyProfile, CompanyType, DataSource, IcnCapability, VerificationStatus,
};
