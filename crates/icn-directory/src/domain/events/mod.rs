//! Domain Events
//!
//! Raised by the directory service when the collection changes.

use chrono::{DateTime, Utc};
use crate::domain::value_objects::EntityId;

/// All domain events in the directory bounded context
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Company(CompanyEvent),
    DatasetLoaded {
        companies: usize,
        skipped_rows: usize,
        loaded_at: DateTime<Utc>,
    },
}

/// Company-related domain events
#[derive(Clone, Debug, PartialEq)]
pub enum CompanyEvent {
    Created {
        company_id: EntityId,
        name: String,
        created_at: DateTime<Utc>,
    },

    Updated {
        company_id: EntityId,
        updated_at: DateTime<Utc>,
    },

    Deleted {
        company_id: EntityId,
        deleted_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Company the event concerns, if any
    pub fn company_id(&self) -> Option<&EntityId> {
        match self {
            Self::Company(CompanyEvent::Created { company_id, .. })
            | Self::Company(CompanyEvent::Updated { company_id, .. })
            | Self::Company(CompanyEvent::Deleted { company_id, .. }) => Some(company_id),
            Self::DatasetLoaded { .. } => None,
        }
    }
}
