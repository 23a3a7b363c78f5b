use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::transfer::TransferId;

pub type Result<T> = std::result::Result<T, TransferError>;

/// Every way a coordinator command can be refused.
///
/// All variants are recoverable from the caller's perspective: the coordinator
/// holds no state of its own, so a rejected command leaves the ledger exactly
/// as it was.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("malformed address: {0}")]
    InvalidAddress(String),
    #[error("address {0} is not a registered signer")]
    Unauthorized(String),
    #[error("transfer {requested} is stale; latest transfer is {latest}")]
    StaleTransfer {
        requested: TransferId,
        latest: TransferId,
    },
    #[error("signer {signer} already approved transfer {id}")]
    AlreadyApproved { signer: String, id: TransferId },
    #[error("transfer {0} already executed")]
    AlreadyExecuted(TransferId),
    #[error("insufficient vault balance: payout needs {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    #[error("transfer {0} not found")]
    NotFound(TransferId),
    #[error("concurrent update on transfer {0}")]
    Conflict(TransferId),
    #[error("invalid signer registry: {0}")]
    Registry(String),
    #[error("malformed command: {0}")]
    MalformedCommand(&'static str),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Storage(#[from] rocksdb::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
