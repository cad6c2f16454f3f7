use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db,
    domain::{Record, RecordKind, Summary, WindowReport},
};

pub const INCOME_WINDOW_DAYS: i64 = 60;
pub const EXPENSE_WINDOW_DAYS: i64 = 30;
pub const RECENT_PER_KIND: u32 = 5;

// The report is a pure function of the stored records and the supplied
// reference instant. Nothing in here reads the clock.
pub async fn compute_summary(
    pool: &SqlitePool,
    owner: Uuid,
    now: DateTime<Utc>,
) -> Result<Summary, sqlx::Error> {
    let today = now.date_naive();
    let income_cutoff = today - Duration::days(INCOME_WINDOW_DAYS);
    let expense_cutoff = today - Duration::days(EXPENSE_WINDOW_DAYS);

    let (
        total_income,
        total_expenses,
        income_window,
        expense_window,
        recent_income,
        recent_expenses,
    ) = tokio::try_join!(
        db::sum_by_owner(pool, RecordKind::Income, owner),
        db::sum_by_owner(pool, RecordKind::Expense, owner),
        db::list_by_owner_since(pool, RecordKind::Income, owner, income_cutoff),
        db::list_by_owner_since(pool, RecordKind::Expense, owner, expense_cutoff),
        db::list_recent_by_owner(pool, RecordKind::Income, owner, RECENT_PER_KIND),
        db::list_recent_by_owner(pool, RecordKind::Expense, owner, RECENT_PER_KIND),
    )?;

    Ok(Summary {
        total_balance: total_income - total_expenses,
        total_income,
        total_expenses,
        last_30_days_expenses: WindowReport {
            total: window_total(&expense_window),
            transactions: expense_window,
        },
        last_60_days_income: WindowReport {
            total: window_total(&income_window),
            transactions: income_window,
        },
        recent_transactions: merge_recent(recent_income, recent_expenses),
    })
}

pub fn merge_recent(recent_income: Vec<Record>, recent_expenses: Vec<Record>) -> Vec<Record> {
    let mut merged = recent_income;
    merged.extend(recent_expenses);
    // Stable sort on the date alone: records sharing a date keep income
    // ahead of expense, and each kind keeps its own newest-first order.
    merged.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on));
    merged
}

fn window_total(records: &[Record]) -> Decimal {
    records.iter().map(|record| record.amount).sum()
}
