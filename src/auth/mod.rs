//! Shared-key authentication for the extraction endpoint.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// The configured auth key callers must present.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct AuthKey(SecretString);

impl AuthKey {
    pub fn new(key: SecretString) -> Self {
        Self(key)
    }

    /// Check a caller-supplied key against the configured one.
    ///
    /// An absent candidate or one whose length differs from the configured
    /// key is rejected up front. Note that the length check leaks whether the
    /// candidate has the right length. Equal-length candidates are compared
    /// with `subtle::ConstantTimeEq`, which XORs every byte pair and
    /// OR-accumulates the result across the whole slice with no early exit,
    /// so the time taken does not depend on where the first mismatch is.
    pub fn is_valid_key(&self, candidate: Option<&[u8]>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        let expected = self.0.expose_secret().as_bytes();
        if candidate.len() != expected.len() {
            return false;
        }
        expected.ct_eq(candidate).into()
    }
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthKey([REDACTED])")
    }
}
