//! Adapters backing the domain ports: the static signer registry and the
//! in-memory and persistent ledgers.

pub mod in_memory;
pub mod registry;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
