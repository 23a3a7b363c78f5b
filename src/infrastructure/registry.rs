use crate::domain::ports::SignerRegistry;
use crate::domain::transfer::Address;
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use std::collections::HashSet;

/// A fixed signer set with a fixed quorum threshold, supplied at startup.
///
/// There is no mutation surface: membership and quorum hold for the lifetime
/// of the process.
#[derive(Debug, Clone)]
pub struct StaticSignerRegistry {
    signers: HashSet<Address>,
    quorum: u32,
}

impl StaticSignerRegistry {
    /// Builds a registry, rejecting an empty signer set and any quorum
    /// outside `1..=signers.len()`.
    pub fn new(signers: impl IntoIterator<Item = Address>, quorum: u32) -> Result<Self> {
        let signers: HashSet<Address> = signers.into_iter().collect();
        if signers.is_empty() {
            return Err(TransferError::Registry(
                "at least one signer is required".to_string(),
            ));
        }
        if quorum == 0 || quorum as usize > signers.len() {
            return Err(TransferError::Registry(format!(
                "quorum {} out of range for {} signers",
                quorum,
                signers.len()
            )));
        }
        Ok(Self { signers, quorum })
    }
}

#[async_trait]
impl SignerRegistry for StaticSignerRegistry {
    async fn is_signer(&self, address: &Address) -> Result<bool> {
        Ok(self.signers.contains(address))
    }

    async fn quorum(&self) -> Result<u32> {
        Ok(self.quorum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_membership_and_quorum() {
        let registry = StaticSignerRegistry::new([addr(ALICE), addr(BOB)], 2).unwrap();
        assert!(registry.is_signer(&addr(ALICE)).await.unwrap());
        assert!(
            !registry
                .is_signer(&addr("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"))
                .await
                .unwrap()
        );
        assert_eq!(registry.quorum().await.unwrap(), 2);
    }

    #[test]
    fn test_quorum_bounds() {
        assert!(matches!(
            StaticSignerRegistry::new([addr(ALICE)], 0),
            Err(TransferError::Registry(_))
        ));
        assert!(matches!(
            StaticSignerRegistry::new([addr(ALICE)], 2),
            Err(TransferError::Registry(_))
        ));
        assert!(matches!(
            StaticSignerRegistry::new([], 1),
            Err(TransferError::Registry(_))
        ));
    }

    #[test]
    fn test_duplicate_signers_collapse() {
        // Two spellings of the same address count as one signer.
        let result = StaticSignerRegistry::new(
            [
                addr(ALICE),
                addr("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
            ],
            2,
        );
        assert!(matches!(result, Err(TransferError::Registry(_))));
    }
}
