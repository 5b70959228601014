//! Ledger records and the identifiers they reference

use crate::core::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

/// Classification tag on a transaction.
///
/// Categories are open. Every tag is trimmed and lower-cased when parsed;
/// anything other than the well-known names lands in `Other` and matches only
/// the same folded tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Deposit,
    Withdraw,
    Refund,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Deposit => "deposit",
            Category::Withdraw => "withdraw",
            Category::Refund => "refund",
            Category::Other(tag) => tag,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        let tag = s.trim().to_lowercase();
        match tag.as_str() {
            "deposit" => Category::Deposit,
            "withdraw" => Category::Withdraw,
            "refund" => Category::Refund,
            _ => Category::Other(tag),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
}

impl User {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: u64,
    pub category: Category,
    pub amount_cents: i64,
    pub amount_currency: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates an entry with the currency stored as an upper-case ISO code.
    pub fn new(
        id: impl Into<String>,
        user: &User,
        category: Category,
        amount: &Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user.id,
            category,
            amount_cents: amount.cents(),
            amount_currency: amount.currency().to_uppercase(),
            created_at,
        }
    }

    pub fn amount(&self) -> Money {
        Money::new(self.amount_cents, &self.amount_currency)
    }
}
