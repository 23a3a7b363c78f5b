use crate::domain::ports::{ApprovalTracker, TransferLedger};
use crate::domain::transfer::{Address, Amount, Balance, Transfer, TransferId, TransferStatus};
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for transfer records, keyed by big-endian id.
pub const CF_TRANSFERS: &str = "transfers";
/// Column Family for (transfer, signer) approval marks.
pub const CF_APPROVALS: &str = "approvals";
/// Column Family for ledger metadata (next id, vault balance).
pub const CF_META: &str = "meta";

const META_NEXT_ID: &[u8] = b"next_id";
const META_BALANCE: &[u8] = b"balance";

/// A persistent ledger implementation using RocksDB.
///
/// Transfers, approval marks, and vault metadata live in separate Column
/// Families with JSON values. Multi-key mutations go through a `WriteBatch`
/// so each command is all-or-nothing, and a mutex serializes the
/// check-and-commit sections across concurrent callers.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbLedger {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbLedger {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transfers = ColumnFamilyDescriptor::new(CF_TRANSFERS, Options::default());
        let cf_approvals = ColumnFamilyDescriptor::new(CF_APPROVALS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transfers, cf_approvals, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            TransferError::Internal(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn approval_key(signer: &Address, id: TransferId) -> Vec<u8> {
        let mut key = id.to_be_bytes().to_vec();
        key.extend_from_slice(signer.as_str().as_bytes());
        key
    }

    fn read_next_id(&self) -> Result<u64> {
        match self.db.get_cf(self.cf(CF_META)?, META_NEXT_ID)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(0),
        }
    }

    fn read_balance(&self) -> Result<Balance> {
        match self.db.get_cf(self.cf(CF_META)?, META_BALANCE)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Balance::ZERO),
        }
    }

    fn read_transfer(&self, id: TransferId) -> Result<Option<Transfer>> {
        match self.db.get_cf(self.cf(CF_TRANSFERS)?, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TransferLedger for RocksDbLedger {
    async fn latest_transfer_id(&self) -> Result<Option<TransferId>> {
        Ok(self.read_next_id()?.checked_sub(1))
    }

    async fn get_transfer(&self, id: TransferId) -> Result<Option<Transfer>> {
        self.read_transfer(id)
    }

    async fn balance(&self) -> Result<Balance> {
        self.read_balance()
    }

    async fn deposit(&self, amount: Amount) -> Result<Balance> {
        let _guard = self.write_lock.lock().await;
        let balance = self.read_balance()? + Balance::from(amount);
        self.db
            .put_cf(self.cf(CF_META)?, META_BALANCE, serde_json::to_vec(&balance)?)?;
        Ok(balance)
    }

    async fn append_transfer(&self, amount: Amount, to: Address) -> Result<TransferId> {
        let _guard = self.write_lock.lock().await;
        let id = self.read_next_id()?;

        let mut batch = WriteBatch::default();
        if let Some(prev_id) = id.checked_sub(1)
            && let Some(mut prev) = self.read_transfer(prev_id)?
        {
            prev.freeze();
            batch.put_cf(
                self.cf(CF_TRANSFERS)?,
                prev_id.to_be_bytes(),
                serde_json::to_vec(&prev)?,
            );
        }
        let transfer = Transfer::new(id, amount, to);
        batch.put_cf(
            self.cf(CF_TRANSFERS)?,
            id.to_be_bytes(),
            serde_json::to_vec(&transfer)?,
        );
        batch.put_cf(self.cf(CF_META)?, META_NEXT_ID, serde_json::to_vec(&(id + 1))?);
        self.db.write(batch)?;

        Ok(id)
    }

    async fn commit_approval(
        &self,
        id: TransferId,
        signer: &Address,
        expected_approvals: u32,
        trigger_payout: bool,
    ) -> Result<Transfer> {
        let _guard = self.write_lock.lock().await;

        let latest = self
            .read_next_id()?
            .checked_sub(1)
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

        let mut transfer = self.read_transfer(id)?.ok_or(TransferError::NotFound(id))?;
        match transfer.status {
            TransferStatus::Created => {}
            TransferStatus::Frozen => return Err(TransferError::Conflict(id)),
            TransferStatus::Executed => return Err(TransferError::AlreadyExecuted(id)),
        }
        if self
            .db
            .get_pinned_cf(self.cf(CF_APPROVALS)?, Self::approval_key(signer, id))?
            .is_some()
        {
            return Err(TransferError::AlreadyApproved {
                signer: signer.to_string(),
                id,
            });
        }
        if transfer.approvals != expected_approvals {
            return Err(TransferError::Conflict(id));
        }
        let mut balance = self.read_balance()?;
        if trigger_payout && balance < Balance::from(transfer.amount) {
            return Err(TransferError::InsufficientFunds {
                needed: transfer.amount.value(),
                available: balance.value(),
            });
        }

        transfer.record_approval()?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_APPROVALS)?,
            Self::approval_key(signer, id),
            [1u8],
        );
        if trigger_payout {
            transfer.execute()?;
            balance -= Balance::from(transfer.amount);
            batch.put_cf(self.cf(CF_META)?, META_BALANCE, serde_json::to_vec(&balance)?);
        }
        batch.put_cf(
            self.cf(CF_TRANSFERS)?,
            id.to_be_bytes(),
            serde_json::to_vec(&transfer)?,
        );
        self.db.write(batch)?;

        Ok(transfer)
    }
}

#[async_trait]
impl ApprovalTracker for RocksDbLedger {
    async fn has_approved(&self, signer: &Address, id: TransferId) -> Result<bool> {
        // Just check if the key exists without retrieving the value
        let result = self
            .db
            .get_pinned_cf(self.cf(CF_APPROVALS)?, Self::approval_key(signer, id))?;
        Ok(result.is_some())
    }
}
