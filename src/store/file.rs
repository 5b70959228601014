use crate::core::money::Money;
use crate::core::transaction::{Category, Transaction};
use crate::store::memory::MemoryLedger;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One entry as written in a ledger file.
///
/// The amount is given either in minor units (`amount_cents`) or as a
/// major-unit decimal (`amount`), never both.
#[derive(Debug, Deserialize)]
struct LedgerRow {
    id: String,
    user_id: u64,
    category: Category,
    #[serde(default)]
    amount_cents: Option<i64>,
    #[serde(default)]
    amount: Option<Decimal>,
    amount_currency: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: LedgerRow) -> Result<Self> {
        let amount_cents = match (row.amount_cents, row.amount) {
            (Some(cents), None) => cents,
            (None, Some(amount)) => Money::from_amount(amount, &row.amount_currency)?.cents(),
            (Some(_), Some(_)) => bail!("Transaction {} sets both amount and amount_cents", row.id),
            (None, None) => bail!("Transaction {} has no amount", row.id),
        };

        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            category: row.category,
            amount_cents,
            amount_currency: row.amount_currency,
            created_at: row.created_at,
        })
    }
}

/// Loads a ledger file into memory.
///
/// The file holds a list of transactions. Files ending in `.json` are read as
/// JSON, everything else as YAML.
pub fn load_ledger<P: AsRef<Path>>(path: P) -> Result<MemoryLedger> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rows: Vec<LedgerRow> = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse ledger file: {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse ledger file: {}", path.display()))?
    };

    let transactions = rows
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Invalid entry in ledger file: {}", path.display()))?;

    debug!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(MemoryLedger::from_transactions(transactions))
}
