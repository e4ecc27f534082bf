use std::collections::HashSet;
use std::sync::RwLock;

/// Process-wide set of revoked token identifiers (`jti` claims).
///
/// Lifecycle: populated when the upstream identity service revokes a
/// credential before its natural expiry, consulted by the auth middleware
/// on every request that presents a token. Entries live until the process
/// restarts, by which time the tokens they name have expired.
#[derive(Debug, Default)]
pub struct RevocationList {
    revoked: RwLock<HashSet<String>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: impl Into<String>) {
        self.revoked
            .write()
            .expect("revocation list poisoned")
            .insert(jti.into());
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .expect("revocation list poisoned")
            .contains(jti)
    }
}

#[cfg(test)]
mod tests;
