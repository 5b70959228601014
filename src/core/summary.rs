//! Per-user deposit, withdraw and refund summaries.
//!
//! A [`SummaryBuilder`] narrows the ledger to one user and currency, and
//! optionally to a lookback window ending at the clock's current instant. The
//! resulting [`FinancialSummary`] answers count and amount questions per
//! category, querying the ledger each time it is asked.

use crate::core::clock::{Clock, SystemClock};
use crate::core::ledger::{Ledger, LedgerFilter};
use crate::core::money::{Money, normalize_currency};
use crate::core::transaction::{Category, User};
use anyhow::{Result, bail};
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::try_join_all;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Lookback window for a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Days(i64),
    Lifetime,
}

impl Window {
    pub const ONE_DAY: Window = Window::Days(1);
    pub const SEVEN_DAYS: Window = Window::Days(7);

    /// Earliest `created_at` included by this window when evaluated at `now`.
    ///
    /// A non-positive day count yields `now` itself. A day count too large to
    /// subtract from `now` yields no bound.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Window::Lifetime => None,
            Window::Days(days) => {
                TimeDelta::try_days((*days).max(0)).and_then(|span| now.checked_sub_signed(span))
            }
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Days(days) => write!(f, "{days}d"),
            Window::Lifetime => write!(f, "lifetime"),
        }
    }
}

impl FromStr for Window {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        if value == "lifetime" {
            return Ok(Window::Lifetime);
        }
        match value.strip_suffix('d').map(str::parse::<i64>) {
            Some(Ok(days)) => Ok(Window::Days(days)),
            _ => bail!("Invalid window: {s} (expected e.g. 1d, 7d or lifetime)"),
        }
    }
}

/// Factory for [`FinancialSummary`] views over one ledger.
#[derive(Clone)]
pub struct SummaryBuilder {
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
}

impl SummaryBuilder {
    pub fn new(ledger: Arc<dyn Ledger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    pub fn with_system_clock(ledger: Arc<dyn Ledger>) -> Self {
        Self::new(ledger, Arc::new(SystemClock))
    }

    pub fn one_day(&self, user: &User, currency: &str) -> FinancialSummary {
        self.n_days_ago(user, currency, 1)
    }

    pub fn seven_days(&self, user: &User, currency: &str) -> FinancialSummary {
        self.n_days_ago(user, currency, 7)
    }

    pub fn lifetime(&self, user: &User, currency: &str) -> FinancialSummary {
        self.for_window(user, currency, Window::Lifetime)
    }

    /// Transactions created at or after `now - days`.
    pub fn n_days_ago(&self, user: &User, currency: &str, days: i64) -> FinancialSummary {
        self.for_window(user, currency, Window::Days(days))
    }

    pub fn for_window(&self, user: &User, currency: &str, window: Window) -> FinancialSummary {
        let currency = normalize_currency(currency);
        let cutoff = window.cutoff(self.clock.now());

        let mut filter = LedgerFilter::new(user.id, &currency);
        if let Some(cutoff) = cutoff {
            filter = filter.created_since(cutoff);
        }
        debug!(user_id = user.id, %currency, %window, ?cutoff, "Built summary view");

        FinancialSummary {
            ledger: Arc::clone(&self.ledger),
            filter,
            window,
        }
    }
}

/// Count and total for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: u64,
    pub amount: Money,
}

/// Read-only view over the transactions of one user in one currency.
#[derive(Clone)]
pub struct FinancialSummary {
    ledger: Arc<dyn Ledger>,
    filter: LedgerFilter,
    window: Window,
}

impl FinancialSummary {
    /// Lower-cased currency code of every amount this view returns.
    pub fn currency(&self) -> &str {
        &self.filter.currency
    }

    pub fn user_id(&self) -> u64 {
        self.filter.user_id
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.filter.since
    }

    pub async fn count(&self, category: impl Into<Category>) -> Result<u64> {
        let filter = self.filter.clone().with_category(category.into());
        let count = self.ledger.count(&filter).await?;
        debug!(category = ?filter.category, count, "Counted transactions");
        Ok(count)
    }

    pub async fn amount(&self, category: impl Into<Category>) -> Result<Money> {
        let filter = self.filter.clone().with_category(category.into());
        let cents = self.ledger.sum_minor_units(&filter).await?;
        debug!(category = ?filter.category, cents, "Summed transactions");
        Ok(Money::new(cents, self.currency()))
    }

    /// Counts and totals for each category, in the order given.
    pub async fn report(&self, categories: &[Category]) -> Result<Vec<CategoryTotal>> {
        let rows = categories.iter().map(|category| async move {
            let (count, amount) =
                futures::try_join!(self.count(category.clone()), self.amount(category.clone()))?;
            Ok::<_, anyhow::Error>(CategoryTotal {
                category: category.clone(),
                count,
                amount,
            })
        });
        try_join_all(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FrozenClock;
    use crate::core::transaction::Transaction;
    use crate::store::memory::MemoryLedger;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn tx(user: &User, category: Category, cents: i64, created_at: DateTime<Utc>) -> Transaction {
        Transaction::new(
            format!("t-{cents}-{}", created_at.timestamp()),
            user,
            category,
            &Money::new(cents, "usd"),
            created_at,
        )
    }

    fn builder(rows: Vec<Transaction>) -> (SummaryBuilder, Arc<FrozenClock>) {
        let clock = Arc::new(FrozenClock::new(now()));
        let ledger = Arc::new(MemoryLedger::from_transactions(rows));
        (SummaryBuilder::new(ledger, clock.clone()), clock)
    }

    struct CountingLedger {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Ledger for CountingLedger {
        async fn count(&self, _filter: &LedgerFilter) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn sum_minor_units(&self, _filter: &LedgerFilter) -> Result<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    struct UnavailableLedger;

    #[async_trait]
    impl Ledger for UnavailableLedger {
        async fn count(&self, _filter: &LedgerFilter) -> Result<u64> {
            Err(anyhow!("ledger unavailable"))
        }

        async fn sum_minor_units(&self, _filter: &LedgerFilter) -> Result<i64> {
            Err(anyhow!("ledger unavailable"))
        }
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!("1d".parse::<Window>().unwrap(), Window::ONE_DAY);
        assert_eq!(" 7D ".parse::<Window>().unwrap(), Window::SEVEN_DAYS);
        assert_eq!("30d".parse::<Window>().unwrap(), Window::Days(30));
        assert_eq!("Lifetime".parse::<Window>().unwrap(), Window::Lifetime);
        assert!("week".parse::<Window>().is_err());
        assert!("d".parse::<Window>().is_err());
        assert_eq!(Window::Days(30).to_string(), "30d");
        assert_eq!(Window::Lifetime.to_string(), "lifetime");
    }

    #[test]
    fn test_window_cutoff() {
        assert_eq!(Window::Lifetime.cutoff(now()), None);
        assert_eq!(
            Window::SEVEN_DAYS.cutoff(now()),
            Some(now() - TimeDelta::days(7))
        );
        assert_eq!(Window::Days(0).cutoff(now()), Some(now()));
        assert_eq!(Window::Days(-3).cutoff(now()), Some(now()));
        assert_eq!(Window::Days(i64::MAX).cutoff(now()), None);
    }

    #[test]
    fn test_view_normalizes_currency() {
        let (builder, _) = builder(vec![]);
        let summary = builder.one_day(&User::new(1), " USD ");
        assert_eq!(summary.currency(), "usd");
        assert_eq!(summary.user_id(), 1);
        assert_eq!(summary.window(), Window::ONE_DAY);
        assert_eq!(summary.since(), Some(now() - TimeDelta::days(1)));
        assert_eq!(builder.lifetime(&User::new(1), "usd").since(), None);
    }

    #[tokio::test]
    async fn test_window_boundary_is_inclusive() {
        let user = User::new(1);
        let cutoff = now() - TimeDelta::days(3);
        let (builder, _) = builder(vec![
            tx(&user, Category::Deposit, 100, cutoff),
            tx(&user, Category::Deposit, 200, cutoff - TimeDelta::seconds(1)),
        ]);

        let summary = builder.n_days_ago(&user, "usd", 3);
        assert_eq!(summary.count(Category::Deposit).await.unwrap(), 1);
        assert_eq!(
            summary.amount(Category::Deposit).await.unwrap(),
            Money::new(100, "usd")
        );
    }

    #[tokio::test]
    async fn test_non_positive_days_match_from_now_on() {
        let user = User::new(1);
        let (builder, _) = builder(vec![
            tx(&user, Category::Deposit, 100, now()),
            tx(&user, Category::Deposit, 200, now() - TimeDelta::minutes(1)),
            tx(&user, Category::Deposit, 400, now() + TimeDelta::minutes(1)),
        ]);

        for days in [0, -1, i64::MIN] {
            let summary = builder.n_days_ago(&user, "usd", days);
            assert_eq!(summary.count(Category::Deposit).await.unwrap(), 2);
            assert_eq!(
                summary.amount(Category::Deposit).await.unwrap(),
                Money::new(500, "usd")
            );
        }
    }

    #[tokio::test]
    async fn test_huge_window_behaves_like_lifetime() {
        let user = User::new(1);
        let (builder, _) = builder(vec![tx(
            &user,
            Category::Refund,
            100,
            now() - TimeDelta::days(10_000),
        )]);

        let summary = builder.n_days_ago(&user, "usd", i64::MAX);
        assert_eq!(summary.count(Category::Refund).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_now_is_read_when_the_view_is_built() {
        let user = User::new(1);
        let (builder, clock) = builder(vec![tx(&user, Category::Deposit, 100, now())]);

        let before = builder.one_day(&user, "usd");
        clock.advance(TimeDelta::days(2));
        let after = builder.one_day(&user, "usd");

        assert_eq!(before.count(Category::Deposit).await.unwrap(), 1);
        assert_eq!(after.count(Category::Deposit).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_every_query_reaches_the_ledger() {
        let ledger = Arc::new(CountingLedger {
            calls: AtomicUsize::new(0),
        });
        let builder = SummaryBuilder::new(ledger.clone(), Arc::new(FrozenClock::new(now())));

        let summary = builder.seven_days(&User::new(1), "usd");
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);

        summary.count(Category::Deposit).await.unwrap();
        summary.count(Category::Deposit).await.unwrap();
        summary.amount(Category::Deposit).await.unwrap();
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_ledger_errors_propagate() {
        let builder =
            SummaryBuilder::new(Arc::new(UnavailableLedger), Arc::new(FrozenClock::new(now())));
        let summary = builder.lifetime(&User::new(1), "usd");

        let err = summary.count(Category::Deposit).await.unwrap_err();
        assert_eq!(err.to_string(), "ledger unavailable");
        assert!(summary.amount(Category::Deposit).await.is_err());
        assert!(summary.report(&[Category::Deposit]).await.is_err());
    }

    #[tokio::test]
    async fn test_report_keeps_category_order() {
        let user = User::new(1);
        let (builder, _) = builder(vec![
            tx(&user, Category::Deposit, 212, now()),
            tx(&user, Category::Deposit, 1000, now()),
            tx(&user, Category::Refund, 1000, now()),
        ]);

        let rows = builder
            .lifetime(&user, "usd")
            .report(&[Category::Refund, Category::Withdraw, Category::Deposit])
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![
                CategoryTotal {
                    category: Category::Refund,
                    count: 1,
                    amount: Money::new(1000, "usd"),
                },
                CategoryTotal {
                    category: Category::Withdraw,
                    count: 0,
                    amount: Money::zero("usd"),
                },
                CategoryTotal {
                    category: Category::Deposit,
                    count: 2,
                    amount: Money::new(1212, "usd"),
                },
            ]
        );
    }
}
