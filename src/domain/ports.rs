use super::transfer::{Address, Amount, Balance, Transfer, TransferId};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only view of the authorized signer set and its quorum threshold.
/// Fixed for the lifetime of the system; the coordinator never mutates it.
#[async_trait]
pub trait SignerRegistry: Send + Sync {
    async fn is_signer(&self, address: &Address) -> Result<bool>;
    async fn quorum(&self) -> Result<u32>;
}

/// The authoritative transfer store. Every mutating call has all-or-nothing
/// semantics, and mutations touching the same transfer are serialized by the
/// implementation.
#[async_trait]
pub trait TransferLedger: Send + Sync {
    async fn latest_transfer_id(&self) -> Result<Option<TransferId>>;
    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>>;
    async fn balance(&self) -> Result<Balance>;

    /// Credits the vault and returns the new balance.
    async fn deposit(&self, amount: Amount) -> Result<Balance>;

    /// Appends a new open transfer with the next dense id and freezes the
    /// previously latest one. Returns the assigned id.
    async fn append_transfer(&self, amount: Amount, to: Address) -> Result<TransferId>;

    /// Conditionally records `signer`'s approval of `id`.
    ///
    /// The commit applies only while `id` is still the latest transfer, the
    /// signer has not approved it before, and its approval count still equals
    /// `expected_approvals`; a lost condition surfaces as
    /// [`TransferError::Conflict`](crate::error::TransferError::Conflict) so
    /// the caller can re-read and retry. When `trigger_payout` is set, the
    /// same commit debits the vault and marks the transfer executed; if the
    /// vault cannot cover the payout the approval is not recorded either.
    async fn commit_approval(
        &self,
        id: TransferId,
        signer: &Address,
        expected_approvals: u32,
        trigger_payout: bool,
    ) -> Result<Transfer>;
}

/// Per (signer, transfer) approval record, queried for uniqueness and for
/// the viewer projection.
#[async_trait]
pub trait ApprovalTracker: Send + Sync {
    async fn has_approved(&self, signer: &Address, id: TransferId) -> Result<bool>;
}

pub type SignerRegistryBox = Box<dyn SignerRegistry>;
pub type TransferLedgerBox = Box<dyn TransferLedger>;
pub type ApprovalTrackerBox = Box<dyn ApprovalTracker>;
