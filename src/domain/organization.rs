use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An organization as recorded on the ledger. Immutable once confirmed;
/// `exists` is a tombstone, since ledger entries are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: u64,
    pub name: String,
    pub exists: bool,
}

/// Validated input for a createOrganization transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDraft {
    pub name: String,
}

impl OrganizationDraft {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}
