use crate::domain::command::{Command, CommandAction};
use crate::domain::ports::{ApprovalTrackerBox, SignerRegistryBox, TransferLedgerBox};
use crate::domain::transfer::{Address, Amount, Balance, Transfer, TransferId, TransferView};
use crate::error::{Result, TransferError};
use rust_decimal::Decimal;
use tracing::info;

/// How many times a lost conditional commit is retried before the conflict
/// is surfaced to the caller.
const MAX_COMMIT_ATTEMPTS: usize = 3;

/// The main entry point for coordinating quorum-approved transfers.
///
/// `TransferCoordinator` enforces the approval rules against the ledger and
/// registry ports. It caches nothing between calls: every decision re-reads
/// current state and the atomicity of the resulting mutation comes from the
/// ledger's transactional commit.
pub struct TransferCoordinator {
    registry: SignerRegistryBox,
    ledger: TransferLedgerBox,
    approvals: ApprovalTrackerBox,
}

impl TransferCoordinator {
    /// Creates a new `TransferCoordinator` instance.
    ///
    /// # Arguments
    ///
    /// * `registry` - The authorized signer set and quorum threshold.
    /// * `ledger` - The authoritative transfer store.
    /// * `approvals` - The per-signer approval records.
    pub fn new(
        registry: SignerRegistryBox,
        ledger: TransferLedgerBox,
        approvals: ApprovalTrackerBox,
    ) -> Self {
        Self {
            registry,
            ledger,
            approvals,
        }
    }

    /// Proposes a new transfer and returns its ledger-assigned id.
    ///
    /// Creation is unilateral: any registered signer may propose, and the new
    /// transfer starts with zero approvals. Appending supersedes the previous
    /// latest transfer, which stops accepting approvals. Validation happens
    /// before the ledger is touched, so a rejected proposal consumes no id.
    pub async fn create_transfer(
        &self,
        amount: Decimal,
        to: &str,
        requester: &Address,
    ) -> Result<TransferId> {
        let amount = Amount::try_from(amount)?;
        let to: Address = to.parse()?;
        if !self.registry.is_signer(requester).await? {
            return Err(TransferError::Unauthorized(requester.to_string()));
        }

        let id = self.ledger.append_transfer(amount, to.clone()).await?;
        info!(id, amount = %amount, to = %to, "transfer created");
        Ok(id)
    }

    /// Records `signer`'s approval of the latest transfer.
    ///
    /// The approval that brings the count to quorum also executes the payout,
    /// atomically in the same ledger commit; there is no separate send step.
    /// A failed payout leaves the approval unrecorded so the signer can retry
    /// once the vault is funded.
    pub async fn approve_transfer(&self, id: TransferId, signer: &Address) -> Result<Transfer> {
        if !self.registry.is_signer(signer).await? {
            return Err(TransferError::Unauthorized(signer.to_string()));
        }
        let quorum = self.registry.quorum().await?;

        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let latest = self
                .ledger
                .latest_transfer_id()
                .await?
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

            let transfer = self
                .ledger
                .get_transfer(id)
                .await?
                .ok_or(TransferError::NotFound(id))?;
            if transfer.is_executed() {
                return Err(TransferError::AlreadyExecuted(id));
            }
            if self.approvals.has_approved(signer, id).await? {
                return Err(TransferError::AlreadyApproved {
                    signer: signer.to_string(),
                    id,
                });
            }

            let trigger_payout = transfer.approvals + 1 >= quorum;
            match self
                .ledger
                .commit_approval(id, signer, transfer.approvals, trigger_payout)
                .await
            {
                Ok(committed) => {
                    if committed.is_executed() {
                        info!(id, amount = %committed.amount, to = %committed.to,
                            "quorum reached, transfer executed");
                    } else {
                        info!(id, approvals = committed.approvals, "approval recorded");
                    }
                    return Ok(committed);
                }
                // Another signer's commit landed first; re-read and retry.
                Err(TransferError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TransferError::Conflict(id))
    }

    /// Pure read of the latest transfer merged with whether `viewer` already
    /// approved it. `None` means the system is ready for a new proposal:
    /// either nothing was ever created or the latest transfer has executed.
    pub async fn current_transfer(&self, viewer: &Address) -> Result<Option<TransferView>> {
        let Some(latest) = self.ledger.latest_transfer_id().await? else {
            return Ok(None);
        };
        let transfer = self
            .ledger
            .get_transfer(latest)
            .await?
            .ok_or(TransferError::NotFound(latest))?;
        if transfer.is_executed() {
            return Ok(None);
        }
        let already_approved = self.approvals.has_approved(viewer, latest).await?;
        Ok(Some(TransferView::project(&transfer, already_approved)))
    }

    /// Credits the vault. Funding is open to anyone, not just signers.
    pub async fn fund(&self, amount: Decimal) -> Result<Balance> {
        let amount = Amount::try_from(amount)?;
        let balance = self.ledger.deposit(amount).await?;
        info!(amount = %amount, balance = %balance, "vault funded");
        Ok(balance)
    }

    pub async fn vault_balance(&self) -> Result<Balance> {
        self.ledger.balance().await
    }

    /// Dispatches one batch command to the operation it names.
    pub async fn process_command(&self, cmd: Command) -> Result<()> {
        match cmd.action {
            CommandAction::Fund => {
                let amount = cmd
                    .amount
                    .ok_or(TransferError::MalformedCommand("fund requires an amount"))?;
                self.fund(amount).await?;
            }
            CommandAction::Create => {
                let signer: Address = cmd
                    .signer
                    .ok_or(TransferError::MalformedCommand("create requires a signer"))?
                    .parse()?;
                let amount = cmd
                    .amount
                    .ok_or(TransferError::MalformedCommand("create requires an amount"))?;
                let to = cmd
                    .to
                    .ok_or(TransferError::MalformedCommand("create requires a destination"))?;
                self.create_transfer(amount, &to, &signer).await?;
            }
            CommandAction::Approve => {
                let signer: Address = cmd
                    .signer
                    .ok_or(TransferError::MalformedCommand("approve requires a signer"))?
                    .parse()?;
                let id = cmd.id.ok_or(TransferError::MalformedCommand(
                    "approve requires a transfer id",
                ))?;
                self.approve_transfer(id, &signer).await?;
            }
        }
        Ok(())
    }
}
