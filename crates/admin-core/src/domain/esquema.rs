//! Provisioned schema handle

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// PostgreSQL truncates identifiers beyond 63 bytes.
const MAX_IDENT_LENGTH: usize = 63;

/// Identifier of a tenant's isolated schema.
///
/// The provisioner is the only component that mints new handles; everyone
/// else receives them from the registry row, or parses a caller-supplied
/// rename target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaHandle(String);

impl SchemaHandle {
    /// Validate a raw identifier: lowercase ASCII letters, digits and
    /// underscores, not starting with a digit, at most 63 bytes.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let starts_ok = raw
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
        let chars_ok = raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if starts_ok && chars_ok && raw.len() <= MAX_IDENT_LENGTH {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::ValidationError(format!(
                "invalid schema identifier: {raw}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchemaHandle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaHandle> for String {
    fn from(value: SchemaHandle) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_identifiers() {
        assert!(SchemaHandle::parse("tenant_acme_x4k2q9").is_ok());
        assert!(SchemaHandle::parse("_interno").is_ok());
    }

    #[test]
    fn rejects_uppercase_and_punctuation() {
        assert!(SchemaHandle::parse("Tenant").is_err());
        assert!(SchemaHandle::parse("tenant-acme").is_err());
        assert!(SchemaHandle::parse("tenant acme").is_err());
        assert!(SchemaHandle::parse("tenant;drop").is_err());
    }

    #[test]
    fn rejects_leading_digit_and_empty() {
        assert!(SchemaHandle::parse("1tenant").is_err());
        assert!(SchemaHandle::parse("").is_err());
    }

    #[test]
    fn rejects_oversized_identifiers() {
        let raw = "a".repeat(64);
        assert!(SchemaHandle::parse(&raw).is_err());
        let raw = "a".repeat(63);
        assert!(SchemaHandle::parse(&raw).is_ok());
    }
}
