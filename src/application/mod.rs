//! Application layer containing the core coordination logic.
//!
//! This module defines the `TransferCoordinator`, the primary entry point for
//! proposing, approving, and executing quorum-custody transfers against the
//! ledger ports.

pub mod coordinator;
