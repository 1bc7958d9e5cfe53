//! Feature Gating and Usage Limits
//!
//! The tier → feature matrix and tier → limit table. Both are exhaustive
//! matches, so adding a tier, feature or limit fails to compile until every
//! entry has been decided.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::model::{Feature, LimitType, Tier};

/// Numeric usage limit for a (tier, limit) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quota {
    /// No ceiling
    Unlimited,
    /// At most this many. `Max(0)` means not permitted.
    Max(u32),
}

impl Quota {
    /// Raw integer form: `-1` for unlimited, otherwise the ceiling
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::Unlimited => -1,
            Self::Max(n) => i64::from(*n),
        }
    }

    /// Inverse of [`Quota::as_raw`]. Any negative value reads as unlimited.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Self::Unlimited
        } else {
            Self::Max(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }

    /// True when nothing at all is allowed
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Max(0))
    }

    /// Deny when `current` has already reached the ceiling
    pub fn check(&self, limit_type: LimitType, current: usize) -> Result<(), QuotaExceeded> {
        match self {
            Self::Unlimited => Ok(()),
            Self::Max(max) if current >= *max as usize => Err(QuotaExceeded {
                limit_type,
                limit: *max,
                current,
            }),
            Self::Max(_) => Ok(()),
        }
    }

    /// Remaining headroom, `None` if unlimited
    pub fn remaining(&self, current: usize) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::Max(max) => Some((*max as usize).saturating_sub(current)),
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Max(n) => write!(f, "{}", n),
        }
    }
}

/// Usage ceiling hit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} limit reached: {limit} allowed, {current} in use", .limit_type.noun())]
pub struct QuotaExceeded {
    /// Which counter
    pub limit_type: LimitType,
    /// Configured ceiling
    pub limit: u32,
    /// Count at the time of the check
    pub current: usize,
}

/// Which company fields an export may include
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFieldSet {
    /// Export not available
    None,
    /// Name, state, sectors
    Basic,
    /// Basic plus address, type, verification, capabilities
    Medium,
    /// Everything including contact details and provenance
    Full,
}

impl ExportFieldSet {
    /// Field set granted to a tier
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Free => Self::None,
            Tier::Plus => Self::Medium,
            Tier::Premium => Self::Full,
        }
    }
}

/// True iff `tier` is in the feature's allowed-tier set
pub fn has_feature(tier: Tier, feature: Feature) -> bool {
    tier >= feature.minimum_tier()
}

/// String-keyed variant of [`has_feature`]. Unknown feature names are never
/// granted; unrecognized tiers are treated as free.
pub fn has_feature_named(tier: &str, feature: &str) -> bool {
    match feature.parse::<Feature>() {
        Ok(feature) => has_feature(Tier::from_str_lenient(tier), feature),
        Err(_) => false,
    }
}

/// Configured limit for a tier
pub fn limit_for(tier: Tier, limit_type: LimitType) -> Quota {
    match (tier, limit_type) {
        (Tier::Free, LimitType::Bookmarks) => Quota::Max(5),
        (Tier::Free, LimitType::SavedSearches) => Quota::Max(0),
        (Tier::Free, LimitType::Exports) => Quota::Max(0),
        (Tier::Plus, LimitType::Bookmarks) => Quota::Unlimited,
        (Tier::Plus, LimitType::SavedSearches) => Quota::Max(10),
        (Tier::Plus, LimitType::Exports) => Quota::Max(100),
        (Tier::Premium, _) => Quota::Unlimited,
    }
}

/// String-keyed variant of [`limit_for`] returning the raw integer.
/// Unknown limit names yield `0`, unlimited is `-1`.
pub fn limit_for_named(tier: &str, limit_type: &str) -> i64 {
    match limit_type.parse::<LimitType>() {
        Ok(limit_type) => limit_for(Tier::from_str_lenient(tier), limit_type).as_raw(),
        Err(_) => 0,
    }
}

/// Resolved entitlements for a tier
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entitlements {
    /// Tier these were resolved for
    pub tier: Tier,
    /// Granted features
    pub features: BTreeSet<FeatureName>,
    /// Bookmark ceiling
    pub bookmarks: Quota,
    /// Saved search ceiling
    pub saved_searches: Quota,
    /// Monthly export ceiling
    pub exports: Quota,
    /// Export column set
    pub export_fields: ExportFieldSet,
}

/// Feature wire name, ordered for stable display
pub type FeatureName = &'static str;

impl Entitlements {
    /// Resolve the full snapshot for a tier
    pub fn for_tier(tier: Tier) -> Self {
        Self {
            tier,
            features: Feature::ALL
                .into_iter()
                .filter(|f| has_feature(tier, *f))
                .map(|f| f.as_str())
                .collect(),
            bookmarks: limit_for(tier, LimitType::Bookmarks),
            saved_searches: limit_for(tier, LimitType::SavedSearches),
            exports: limit_for(tier, LimitType::Exports),
            export_fields: ExportFieldSet::for_tier(tier),
        }
    }

    /// Whether the snapshot includes a feature
    pub fn is_entitled_to(&self, feature: Feature) -> bool {
        self.features.contains(feature.as_str())
    }

    /// Limit lookup on the snapshot
    pub fn quota(&self, limit_type: LimitType) -> Quota {
        match limit_type {
            LimitType::Bookmarks => self.bookmarks,
            LimitType::SavedSearches => self.saved_searches,
            LimitType::Exports => self.exports,
        }
    }
}
