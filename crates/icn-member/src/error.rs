//! Member error types

use icn_directory::DirectoryError;
use icn_entitlements::{Feature, LimitType, QuotaExceeded, Tier};

/// Failures from gated member operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MemberError {
    #[error("sign in required")]
    NotAuthenticated,

    #[error(
        "{} requires the {} plan or higher (current plan: {})",
        .feature.label(),
        .required.display_name(),
        .current.display_name()
    )]
    TierDenied {
        feature: Feature,
        required: Tier,
        current: Tier,
    },

    #[error("{} limit reached: your plan allows {limit}", .limit_type.noun())]
    LimitReached { limit_type: LimitType, limit: u32 },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl MemberError {
    pub(crate) fn denied(feature: Feature, current: Tier) -> Self {
        Self::TierDenied {
            feature,
            required: feature.minimum_tier(),
            current,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True for tier and limit denials, which an upgrade would resolve
    pub fn is_upgrade_required(&self) -> bool {
        matches!(self, Self::TierDenied { .. } | Self::LimitReached { .. })
    }
}

impl From<QuotaExceeded> for MemberError {
    fn from(e: QuotaExceeded) -> Self {
        Self::LimitReached {
            limit_type: e.limit_type,
            limit: e.limit,
        }
    }
}

pub type MemberResult<T> = Result<T, MemberError>;
