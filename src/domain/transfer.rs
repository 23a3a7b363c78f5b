use crate::error::TransferError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Ledger-assigned transfer identifier. Dense, strictly increasing from 0,
/// never reused.
pub type TransferId = u64;

/// Represents a positive quantity of value to move.
///
/// This is a wrapper around `rust_decimal::Decimal` that makes a zero or
/// negative transfer amount unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, TransferError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(TransferError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = TransferError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The vault's balance in base currency units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A destination or signer address: `0x` followed by 40 hex digits.
///
/// Parsing normalizes to lowercase so addresses compare and hash by value
/// regardless of the casing they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| TransferError::InvalidAddress(s.to_string()))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TransferError::InvalidAddress(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Address {
    type Error = TransferError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a transfer sits in its lifecycle. `Frozen` and `Executed` are
/// absorbing: a superseded transfer never accepts another approval, and a
/// payout happens at most once.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Created,
    Frozen,
    Executed,
}

/// One proposed movement of funds out of the vault.
///
/// `amount` and `to` are fixed at creation; only `approvals` and `status`
/// change afterwards, and only through the guarded methods below.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transfer {
    pub id: TransferId,
    pub amount: Amount,
    pub to: Address,
    pub approvals: u32,
    pub status: TransferStatus,
}

impl Transfer {
    pub fn new(id: TransferId, amount: Amount, to: Address) -> Self {
        Self {
            id,
            amount,
            to,
            approvals: 0,
            status: TransferStatus::Created,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.status == TransferStatus::Executed
    }

    pub fn is_open(&self) -> bool {
        self.status == TransferStatus::Created
    }

    /// Counts one more distinct approval. Only an open transfer accepts
    /// approvals; a frozen one is reachable here only through a racing
    /// supersession, which the caller retries.
    pub fn record_approval(&mut self) -> Result<(), TransferError> {
        match self.status {
            TransferStatus::Created => {
                self.approvals += 1;
                Ok(())
            }
            TransferStatus::Frozen => Err(TransferError::Conflict(self.id)),
            TransferStatus::Executed => Err(TransferError::AlreadyExecuted(self.id)),
        }
    }

    /// Marks the payout done. A transfer executes at most once.
    pub fn execute(&mut self) -> Result<(), TransferError> {
        match self.status {
            TransferStatus::Created => {
                self.status = TransferStatus::Executed;
                Ok(())
            }
            TransferStatus::Frozen => Err(TransferError::Conflict(self.id)),
            TransferStatus::Executed => Err(TransferError::AlreadyExecuted(self.id)),
        }
    }

    /// Freezes an open transfer when a newer one supersedes it. Executed
    /// transfers stay executed.
    pub fn freeze(&mut self) {
        if self.status == TransferStatus::Created {
            self.status = TransferStatus::Frozen;
        }
    }
}

/// The projection handed to the view layer: the latest transfer merged with
/// whether the viewing signer has already approved it.
#[derive(Debug, PartialEq, Clone)]
pub struct TransferView {
    pub id: TransferId,
    pub amount: Amount,
    pub to: Address,
    pub approvals: u32,
    pub executed: bool,
    pub already_approved: bool,
}

impl TransferView {
    pub fn project(transfer: &Transfer, already_approved: bool) -> Self {
        Self {
            id: transfer.id,
            amount: transfer.amount,
            to: transfer.to.clone(),
            approvals: transfer.approvals,
            executed: transfer.is_executed(),
            already_approved,
        }
    }
}
