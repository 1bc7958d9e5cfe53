//! ICN Navigator Entitlements
//!
//! Subscription tiers and the rules table that gates features and usage.
//!
//! # Model
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      ENTITLEMENT ENGINE                       │
//! │                                                               │
//! │   Tier ──► Feature matrix  ──► has_feature(tier, feature)     │
//! │     │                                                         │
//! │     └────► Limit table     ──► limit_for(tier, limit) : Quota │
//! │                                                               │
//! │   free  ⊆  plus  ⊆  premium        premium limits: unlimited  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs. Callers turn a denied
//! feature or an exhausted quota into a user-facing error.

#![warn(missing_docs)]

pub mod model;
pub mod entitlements;

pub use model::{Feature, LimitType, Tier, EntitlementError};
pub use entitlements::{
    has_feature, has_feature_named, limit_for, limit_for_named, Entitlements, ExportFieldSet,
    Quota, QuotaExceeded,
};

/// Result type for entitlement lookups
pub type Result<T> = std::result::Result<T, EntitlementError>;
