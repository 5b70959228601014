//! Ledger query abstractions

use crate::core::money::normalize_currency;
use crate::core::transaction::{Category, Transaction};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Predicate selecting ledger rows.
///
/// `currency` is stored normalized and compared against each row's
/// normalized currency, so the match is case-insensitive. `since` is an
/// inclusive lower bound on `created_at` and `before` an exclusive upper one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFilter {
    pub user_id: u64,
    pub currency: String,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub category: Option<Category>,
}

impl LedgerFilter {
    pub fn new(user_id: u64, currency: &str) -> Self {
        Self {
            user_id,
            currency: normalize_currency(currency),
            since: None,
            before: None,
            category: None,
        }
    }

    pub fn created_since(mut self, cutoff: DateTime<Utc>) -> Self {
        self.since = Some(cutoff);
        self
    }

    pub fn created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.before = Some(cutoff);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.user_id == self.user_id
            && tx.amount().currency() == self.currency
            && self.since.is_none_or(|cutoff| tx.created_at >= cutoff)
            && self.before.is_none_or(|cutoff| tx.created_at < cutoff)
            && self
                .category
                .as_ref()
                .is_none_or(|category| &tx.category == category)
    }
}

/// Read access to a transaction ledger.
///
/// Implementations evaluate the filter at call time and report storage
/// failures through the returned `Result`.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn count(&self, filter: &LedgerFilter) -> Result<u64>;

    /// Sum of `amount_cents` over the matching rows, 0 when none match.
    async fn sum_minor_units(&self, filter: &LedgerFilter) -> Result<i64>;
}
