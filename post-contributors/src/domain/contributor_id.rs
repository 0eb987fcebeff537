//! Contributor identifiers and the sanitizer applied to untrusted input.

use std::fmt;
use std::str::FromStr;

/// Identifier of a user entity in the host identity store.
///
/// Host user IDs are positive integers; `0` never names a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ContributorId(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContributorIdError {
    #[error("contributor id is empty")]
    Empty,

    #[error("contributor id is not numeric: {0:?}")]
    NotNumeric(String),

    #[error("contributor id must be positive")]
    Zero,

    #[error("contributor id is out of range: {0}")]
    OutOfRange(String),
}

impl ContributorId {
    /// Builds an id from a raw integer. Returns `None` for `0`.
    pub fn new(value: u64) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Sanitizes one untrusted value.
    ///
    /// Leading and trailing whitespace and control characters are trimmed;
    /// what remains must be a plain run of ASCII digits. Anything embedded
    /// between the digits rejects the value.
    pub fn sanitize(raw: &str) -> Result<Self, ContributorIdError> {
        let cleaned = raw.trim_matches(|c: char| c.is_whitespace() || c.is_control());

        if cleaned.is_empty() {
            return Err(ContributorIdError::Empty);
        }
        if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ContributorIdError::NotNumeric(cleaned.to_string()));
        }

        let value: u64 = cleaned
            .parse()
            .map_err(|_| ContributorIdError::OutOfRange(cleaned.to_string()))?;

        Self::new(value).ok_or(ContributorIdError::Zero)
    }
}

impl FromStr for ContributorId {
    type Err = ContributorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::sanitize(s)
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
