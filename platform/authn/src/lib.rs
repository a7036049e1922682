//! Static API key authentication.
//!
//! A single process-wide secret is compared against the `X-API-Key` header.
//! There is no rotation, expiry or per-key scoping.

use std::fmt;

use thiserror::Error;

/// Request header carrying the caller's key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthnError {
    #[error("no API key configured")]
    NotConfigured,
    #[error("API key header missing")]
    MissingKey,
    #[error("API key mismatch")]
    InvalidKey,
}

#[derive(Clone, Default)]
pub struct ApiKeyGate {
    expected: Option<String>,
}

impl ApiKeyGate {
    /// An empty secret counts as unset.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|key| !key.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Exact string comparison of the presented key with the configured one.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthnError> {
        let expected = self.expected.as_deref().ok_or(AuthnError::NotConfigured)?;
        let presented = presented.ok_or(AuthnError::MissingKey)?;
        if presented == expected {
            Ok(())
        } else {
            Err(AuthnError::InvalidKey)
        }
    }
}

impl fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_key() {
        let gate = ApiKeyGate::new(Some("kier".into()));
        assert_eq!(gate.verify(Some("kier")), Ok(()));
    }

    #[test]
    fn rejects_missing_or_wrong_key() {
        let gate = ApiKeyGate::new(Some("kier".into()));
        assert_eq!(gate.verify(None), Err(AuthnError::MissingKey));
        assert_eq!(gate.verify(Some("Kier")), Err(AuthnError::InvalidKey));
        assert_eq!(gate.verify(Some("kier ")), Err(AuthnError::InvalidKey));
    }

    #[test]
    fn unconfigured_gate_rejects_everything() {
        let gate = ApiKeyGate::new(None);
        assert_eq!(gate.verify(Some("kier")), Err(AuthnError::NotConfigured));
        assert_eq!(
            ApiKeyGate::new(Some(String::new())).verify(Some("")),
            Err(AuthnError::NotConfigured)
        );
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let gate = ApiKeyGate::new(Some("woe".into()));
        assert!(!format!("{gate:?}").contains("woe"));
    }
}
