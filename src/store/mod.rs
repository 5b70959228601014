//! Ledger implementations

pub mod file;
pub mod memory;

pub use file::load_ledger;
pub use memory::MemoryLedger;
