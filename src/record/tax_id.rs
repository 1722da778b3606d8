//! Tax identification number (MST) used as the record key

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Returned when a string cannot be used as a tax ID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tax ID '{0}': expected a non-empty run of ASCII digits")]
pub struct InvalidTaxId(pub String);

/// A non-empty, digits-only tax identifier
///
/// Two records with the same `TaxId` are the same organization regardless
/// of any other field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Creates a tax ID, rejecting empty or non-digit input
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidTaxId> {
        let value = value.into();
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(InvalidTaxId(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaxId {
    type Error = InvalidTaxId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxId> for String {
    fn from(id: TaxId) -> Self {
        id.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
