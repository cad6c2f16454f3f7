use chrono::{Duration, NaiveDate, TimeZone, Utc};
use finboard::db;
use finboard::domain::{Record, RecordKind, User};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite://{}", dir.path().join("finboard.sqlite").display());
    let pool = db::create_pool(&database_url).await.unwrap();
    db::init_schema(&pool).await.unwrap();
    (dir, pool)
}

async fn seed_user(pool: &SqlitePool) -> Uuid {
    let user = User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: String::from("not-a-real-hash"),
        created_at: Utc::now(),
    };
    db::insert_user(pool, &user).await.unwrap();
    user.id
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn record(
    owner: Uuid,
    kind: RecordKind,
    label: &str,
    amount: &str,
    occurred_on: NaiveDate,
    seq: i64,
) -> Record {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq);
    Record {
        id: Uuid::new_v4(),
        owner,
        kind,
        label: label.to_string(),
        amount: dec(amount),
        occurred_on,
        icon: None,
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
async fn inserted_records_round_trip_through_the_store() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    let mut entry = record(owner, RecordKind::Income, "Salary", "1234.56", date(10), 1);
    entry.icon = Some(String::from("briefcase"));
    db::insert_record(&pool, &entry).await.unwrap();

    let listed = db::list_by_owner(&pool, RecordKind::Income, owner).await.unwrap();

    assert_eq!(listed, vec![entry]);
}

#[tokio::test]
async fn listing_is_newest_first_with_ties_broken_by_creation() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    let older = record(owner, RecordKind::Expense, "Older", "10", date(5), 1);
    let tie_first = record(owner, RecordKind::Expense, "TieFirst", "10", date(12), 2);
    let tie_second = record(owner, RecordKind::Expense, "TieSecond", "10", date(12), 3);
    db::insert_record(&pool, &older).await.unwrap();
    db::insert_record(&pool, &tie_first).await.unwrap();
    db::insert_record(&pool, &tie_second).await.unwrap();

    let listed = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();

    let labels: Vec<&str> = listed.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["TieSecond", "TieFirst", "Older"]);
}

#[tokio::test]
async fn listing_breaks_exact_timestamp_ties_by_insertion_order() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    // same day and the same creation instant, only insertion order differs
    let first = record(owner, RecordKind::Expense, "First", "10", date(12), 1);
    let second = record(owner, RecordKind::Expense, "Second", "10", date(12), 1);
    let third = record(owner, RecordKind::Expense, "Third", "10", date(12), 1);
    db::insert_record(&pool, &first).await.unwrap();
    db::insert_record(&pool, &second).await.unwrap();
    db::insert_record(&pool, &third).await.unwrap();

    let listed = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();

    let labels: Vec<&str> = listed.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn listing_is_scoped_to_kind_and_owner() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;
    let other = seed_user(&pool).await;

    let income = record(owner, RecordKind::Income, "Salary", "100", date(10), 1);
    let expense = record(owner, RecordKind::Expense, "Rent", "80", date(11), 2);
    let foreign = record(other, RecordKind::Income, "Foreign", "999", date(12), 3);
    db::insert_record(&pool, &income).await.unwrap();
    db::insert_record(&pool, &expense).await.unwrap();
    db::insert_record(&pool, &foreign).await.unwrap();

    let incomes = db::list_by_owner(&pool, RecordKind::Income, owner).await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].label, "Salary");

    let expenses = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].label, "Rent");
}

#[tokio::test]
async fn since_listing_keeps_the_cutoff_day_and_drops_older_ones() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    let before = record(owner, RecordKind::Expense, "Before", "10", date(9), 1);
    let on_cutoff = record(owner, RecordKind::Expense, "OnCutoff", "20", date(10), 2);
    let after = record(owner, RecordKind::Expense, "After", "30", date(11), 3);
    db::insert_record(&pool, &before).await.unwrap();
    db::insert_record(&pool, &on_cutoff).await.unwrap();
    db::insert_record(&pool, &after).await.unwrap();

    let listed = db::list_by_owner_since(&pool, RecordKind::Expense, owner, date(10))
        .await
        .unwrap();

    let labels: Vec<&str> = listed.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["After", "OnCutoff"]);
}

#[tokio::test]
async fn recent_listing_respects_the_limit() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    for day in 1..=6 {
        let entry = record(
            owner,
            RecordKind::Income,
            &format!("Income{}", day),
            "10",
            date(day),
            day as i64,
        );
        db::insert_record(&pool, &entry).await.unwrap();
    }

    let listed = db::list_recent_by_owner(&pool, RecordKind::Income, owner, 3)
        .await
        .unwrap();

    let labels: Vec<&str> = listed.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["Income6", "Income5", "Income4"]);
}

#[tokio::test]
async fn sums_are_exact_on_cent_values() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    // 0.1 + 0.2 drifts under float arithmetic. It must not here.
    let first = record(owner, RecordKind::Expense, "First", "0.1", date(1), 1);
    let second = record(owner, RecordKind::Expense, "Second", "0.2", date(2), 2);
    db::insert_record(&pool, &first).await.unwrap();
    db::insert_record(&pool, &second).await.unwrap();

    let total = db::sum_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();

    assert_eq!(total, dec("0.3"));
}

#[tokio::test]
async fn sum_of_no_records_is_zero() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    let total = db::sum_by_owner(&pool, RecordKind::Income, owner).await.unwrap();

    assert_eq!(total, Decimal::ZERO);
}

#[tokio::test]
async fn delete_removes_only_the_owners_record() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;
    let intruder = seed_user(&pool).await;

    let entry = record(owner, RecordKind::Expense, "Rent", "1200", date(10), 1);
    db::insert_record(&pool, &entry).await.unwrap();

    let deleted = db::delete_by_owner(&pool, RecordKind::Expense, entry.id, intruder)
        .await
        .unwrap();
    assert_eq!(deleted, 0);

    let still_there = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();
    assert_eq!(still_there.len(), 1);

    let deleted = db::delete_by_owner(&pool, RecordKind::Expense, entry.id, owner)
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let gone = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();
    assert!(gone.is_empty());
}

#[tokio::test]
async fn delete_of_an_unknown_id_touches_nothing() {
    let (_dir, pool) = setup().await;
    let owner = seed_user(&pool).await;

    let entry = record(owner, RecordKind::Expense, "Rent", "1200", date(10), 1);
    db::insert_record(&pool, &entry).await.unwrap();

    let deleted = db::delete_by_owner(&pool, RecordKind::Expense, Uuid::new_v4(), owner)
        .await
        .unwrap();
    assert_eq!(deleted, 0);

    let listed = db::list_by_owner(&pool, RecordKind::Expense, owner).await.unwrap();
    assert_eq!(listed.len(), 1);
}
