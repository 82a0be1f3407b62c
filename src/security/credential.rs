//! Bearer credential with automatic memory zeroization
//!
//! The session token is the only secret the gate holds in memory for long.
//! It is wiped when dropped and never printed by `Debug`.

use std::fmt;
use zeroize::Zeroize;

/// An opaque bearer token issued by the identity provider
///
/// # Example
///
/// ```
/// use kvgate::security::Credential;
///
/// let token = Credential::new("tok-123");
/// assert_eq!(token.as_str(), "tok-123");
/// assert_eq!(token.bearer(), "Bearer tok-123");
/// assert!(!format!("{:?}", token).contains("tok-123"));
/// ```
#[derive(Clone)]
pub struct Credential {
    inner: String,
}

impl Credential {
    /// Wraps a token string
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// Returns the raw token
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.inner)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl Zeroize for Credential {
    fn zeroize(&mut self) {
        self.inner.zeroize();
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("len", &self.inner.len())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.inner.as_bytes())
    }
}

impl Eq for Credential {}

impl PartialEq<str> for Credential {
    fn eq(&self, other: &str) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.as_bytes())
    }
}

impl PartialEq<&str> for Credential {
    fn eq(&self, other: &&str) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.as_bytes())
    }
}

/// Constant-time byte comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
