//! Bot account credentials.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

/// Number of leading token characters shown in logs.
const LABEL_LEN: usize = 10;

/// Secret token identifying one bot account.
///
/// Cloning is cheap and the full secret is never printed by `Debug` or
/// `Display`; both show the masked [`label`](Self::label).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccountCredential(Arc<str>);

impl AccountCredential {
    /// Wraps a raw bot token.
    #[must_use]
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for building request URLs.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short prefix of the token, safe to write to logs.
    #[must_use]
    pub fn label(&self) -> String {
        let prefix: String = self.0.chars().take(LABEL_LEN).collect();
        if self.0.chars().count() > LABEL_LEN {
            format!("{prefix}...")
        } else {
            prefix
        }
    }
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountCredential").field(&self.label()).finish()
    }
}

impl fmt::Display for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parses a comma-separated credential list.
///
/// Entries are trimmed, blank entries are skipped and repeated tokens are kept
/// only once: two workers on the same token would compete for `getUpdates`.
#[must_use]
pub fn parse_credential_list(raw: &str) -> Vec<AccountCredential> {
    let mut seen = HashSet::new();
    let mut credentials = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if !seen.insert(entry) {
            warn!(
                "Ignoring duplicate bot token {}",
                AccountCredential::new(entry).label()
            );
            continue;
        }
        credentials.push(AccountCredential::new(entry));
    }

    credentials
}
