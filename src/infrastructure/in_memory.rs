use crate::domain::ports::{ApprovalTracker, TransferLedger};
use crate::domain::transfer::{Address, Amount, Balance, Transfer, TransferId, TransferStatus};
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerState {
    transfers: Vec<Transfer>,
    approvals: HashMap<TransferId, HashSet<Address>>,
    balance: Balance,
}

/// A thread-safe in-memory ledger.
///
/// Holds transfers, approval records, and the vault balance behind one
/// `Arc<RwLock>`; `Clone` shares the underlying state. The whole
/// check-and-commit of every mutation runs under a single write guard, which
/// is what serializes concurrent approvals on the same transfer.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransferLedger for InMemoryLedger {
    async fn latest_transfer_id(&self) -> Result<Option<TransferId>> {
        let state = self.state.read().await;
        Ok(state.transfers.len().checked_sub(1).map(|i| i as u64))
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>> {
        let state = self.state.read().await;
        Ok(state.transfers.get(id as usize).cloned())
    }

    async fn balance(&self) -> Result<Balance> {
        let state = self.state.read().await;
        Ok(state.balance)
    }

    async fn deposit(&self, amount: Amount) -> Result<Balance> {
        let mut state = self.state.write().await;
        state.balance += Balance::from(amount);
        Ok(state.balance)
    }

    async fn append_transfer(&self, amount: Amount, to: Address) -> Result<TransferId> {
        let mut state = self.state.write().await;
        let id = state.transfers.len() as u64;
        if let Some(prev) = state.transfers.last_mut() {
            prev.freeze();
        }
        state.transfers.push(Transfer::new(id, amount, to));
        Ok(id)
    }

    async fn commit_approval(
        &self,
        id: TransferId,
        signer: &Address,
        expected_approvals: u32,
        trigger_payout: bool,
    ) -> Result<Transfer> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let latest = state
            .transfers
            .len()
            .checked_sub(1)
            .map(|i| i as u64)
            .ok_or(TransferError::NotFound(id))?;
        if id > latest {
            return Err(TransferError::NotFound(id));
        }
        if id < latest {
            return Err(TransferError::StaleTransfer {
                requested: id,
                latest,
            });
        }

        let transfer = &state.transfers[id as usize];
        match transfer.status {
            TransferStatus::Created => {}
            TransferStatus::Frozen => return Err(TransferError::Conflict(id)),
            TransferStatus::Executed => return Err(TransferError::AlreadyExecuted(id)),
        }
        if state
            .approvals
            .get(&id)
            .is_some_and(|signers| signers.contains(signer))
        {
            return Err(TransferError::AlreadyApproved {
                signer: signer.to_string(),
                id,
            });
        }
        if transfer.approvals != expected_approvals {
            return Err(TransferError::Conflict(id));
        }
        let amount = transfer.amount;
        if trigger_payout && state.balance < Balance::from(amount) {
            return Err(TransferError::InsufficientFunds {
                needed: amount.value(),
                available: state.balance.value(),
            });
        }

        // All checks passed; apply approval and payout in one guarded section.
        let transfer = &mut state.transfers[id as usize];
        transfer.record_approval()?;
        if trigger_payout {
            transfer.execute()?;
        }
        let committed = transfer.clone();
        if trigger_payout {
            state.balance -= Balance::from(amount);
        }
        state.approvals.entry(id).or_default().insert(signer.clone());

        Ok(committed)
    }
}

#[async_trait]
impl ApprovalTracker for InMemoryLedger {
    async fn has_approved(&self, signer: &Address, id: TransferId) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .approvals
            .get(&id)
            .is_some_and(|signers| signers.contains(signer)))
    }
}
