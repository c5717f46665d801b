//! Block explorer deep links.

use alloy_primitives::TxHash;
use url::Url;

/// Base URL of a block explorer, e.g. `https://etherscan.io`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLink {
    base: Url,
}

impl ExplorerLink {
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL.
    pub fn parse(base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base.trim_end_matches('/'))?;
        Ok(Self { base })
    }

    /// Link to a transaction page.
    #[must_use]
    pub fn tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{hash}", self.base.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tx_url() {
        let link = ExplorerLink::parse("https://sepolia.etherscan.io/").unwrap();
        let hash = TxHash::repeat_byte(0x01);
        assert_eq!(
            link.tx_url(&hash),
            format!("https://sepolia.etherscan.io/tx/{hash}")
        );
    }

    #[test]
    fn rejects_relative_base() {
        assert!(ExplorerLink::parse("etherscan.io").is_err());
    }
}
