//! Bearer credential check for the channel gateway.
//!
//! This is a placeholder: a token is accepted when it is non-empty and
//! carries the configured prefix. No signature or expiry is verified.

use secrecy::{ExposeSecret, Secret};
use super_tools_core::{Error, Result};

const BEARER: &str = "Bearer ";

/// Token from an `Authorization` header value, if it uses the bearer scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    let scheme = header.get(..BEARER.len())?;
    scheme
        .eq_ignore_ascii_case(BEARER)
        .then(|| header[BEARER.len()..].trim())
}

/// Accepts bearer tokens that start with a fixed prefix.
pub struct BearerValidator {
    prefix: Secret<String>,
}

impl BearerValidator {
    pub fn new(prefix: Secret<String>) -> Self {
        Self { prefix }
    }

    /// Validate a raw `Authorization` header and return the token.
    pub fn validate(&self, header: Option<&str>) -> Result<String> {
        let token = header
            .and_then(bearer_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::governance("Missing bearer token"))?;

        if !token.starts_with(self.prefix.expose_secret().as_str()) {
            let shown: String = token.chars().take(10).collect();
            tracing::warn!(token = %shown, "Invalid token provided");
            return Err(Error::governance("Invalid authentication token"));
        }
        Ok(token.to_string())
    }
}

impl std::fmt::Debug for BearerValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerValidator")
            .field("prefix", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> BearerValidator {
        BearerValidator::new(Secret::new("test-token-".to_string()))
    }

    #[test]
    fn test_accepts_prefixed_token() {
        let token = validator().validate(Some("Bearer test-token-abc")).unwrap();
        assert_eq!(token, "test-token-abc");
        assert!(validator().validate(Some("bearer test-token-x")).is_ok());
    }

    #[test]
    fn test_rejects_missing_or_foreign_tokens() {
        let v = validator();
        assert!(v.validate(None).is_err());
        assert!(v.validate(Some("")).is_err());
        assert!(v.validate(Some("Bearer ")).is_err());
        assert!(v.validate(Some("Basic dGVzdA==")).is_err());
        assert!(v.validate(Some("Bearer prod-token-abc")).is_err());
        assert!(v.validate(Some("test-token-abc")).is_err());
    }

    #[test]
    fn test_debug_hides_prefix() {
        assert!(!format!("{:?}", validator()).contains("test-token-"));
    }
}
