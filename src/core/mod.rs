//! Core business logic abstractions

pub mod clock;
pub mod config;
pub mod ledger;
pub mod log;
pub mod money;
pub mod summary;
pub mod transaction;

// Re-export main types for cleaner imports
pub use clock::{Clock, FrozenClock, SystemClock};
pub use ledger::{Ledger, LedgerFilter};
pub use money::Money;
pub use summary::{CategoryTotal, FinancialSummary, SummaryBuilder, Window};
pub use transaction::{Category, Transaction, User};
