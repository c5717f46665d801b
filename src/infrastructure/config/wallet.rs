//! Signing key settings.

use serde::Deserialize;

/// Signer used for approvals and actions.
///
/// The key only ever comes from `WALLET_PRIVATE_KEY`; a `[wallet]` table in
/// the file is accepted but cannot set it.
#[derive(Clone, Default, Deserialize)]
pub struct WalletConfig {
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl WalletConfig {
    /// The configured key, trimmed, if one is set.
    #[must_use]
    pub fn signing_key(&self) -> Option<&str> {
        self.private_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Whether a signing key is available.
    #[must_use]
    pub fn has_signer(&self) -> bool {
        self.signing_key().is_some()
    }
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.has_signer().then_some("<redacted>"))
            .finish()
    }
}
