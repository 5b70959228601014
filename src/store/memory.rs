use crate::core::ledger::{Ledger, LedgerFilter};
use crate::core::money::Money;
use crate::core::transaction::Transaction;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory ledger backed by a vector of transactions
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<Vec<Transaction>>>,
}

impl MemoryLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(transactions)),
        }
    }

    /// Appends a transaction. Seeds fixtures; summaries never write.
    pub async fn insert(&self, transaction: Transaction) {
        let mut rows = self.inner.write().await;
        debug!("Ledger INSERT for transaction: {}", transaction.id);
        rows.push(transaction);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn count(&self, filter: &LedgerFilter) -> Result<u64> {
        let rows = self.inner.read().await;
        let count = rows.iter().filter(|tx| filter.matches(tx)).count() as u64;
        debug!("Ledger COUNT {} for filter: {:?}", count, filter);
        Ok(count)
    }

    async fn sum_minor_units(&self, filter: &LedgerFilter) -> Result<i64> {
        let rows = self.inner.read().await;
        let total = rows
            .iter()
            .filter(|tx| filter.matches(tx))
            .try_fold(Money::zero(&filter.currency), |total, tx| {
                total.checked_add(&tx.amount())
            })
            .with_context(|| format!("Sum overflowed for filter: {filter:?}"))?;
        debug!("Ledger SUM {} for filter: {:?}", total, filter);
        Ok(total.cents())
    }
}
