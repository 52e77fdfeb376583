//! Vote counting.
//!
//! A [`crate::CounterStore`] persists id → count. The remote document store is wrapped in a
//! fallback store that records votes in a device-local ledger while the remote is unreachable,
//! and the ledger is merged back on the next start.

pub(crate) mod document_dir;
pub(crate) mod fallback;
pub(crate) mod ledger;
pub(crate) mod memory;
pub(crate) mod service;
pub(crate) mod storage;
pub(crate) mod store;
