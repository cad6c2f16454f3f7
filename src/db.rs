use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteQueryResult},
};
use uuid::Uuid;

use crate::domain::{Record, RecordKind, User};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS records (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
        label TEXT NOT NULL,
        amount TEXT NOT NULL,
        occurred_on TEXT NOT NULL,
        icon TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_records_owner_kind_date
        ON records (owner_id, kind, occurred_on DESC);
";

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new().connect_with(options).await
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

pub async fn insert_record(
    pool: &SqlitePool,
    record: &Record,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        "
            INSERT INTO records (
                id,
                owner_id,
                kind,
                label,
                amount,
                occurred_on,
                icon,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ",
    )
    .bind(record.id.to_string())
    .bind(record.owner.to_string())
    .bind(record.kind.as_str())
    .bind(&record.label)
    .bind(record.amount.to_string())
    .bind(record.occurred_on)
    .bind(&record.icon)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await
    .inspect_err(|err| {
        tracing::error!(
            "Failed to insert {} record with ID {}: {}",
            record.kind.as_str(),
            &record.id,
            err
        );
    })
}

pub async fn list_by_owner(
    pool: &SqlitePool,
    kind: RecordKind,
    owner: Uuid,
) -> Result<Vec<Record>, sqlx::Error> {
    sqlx::query_as::<_, Record>(
        "
            SELECT * FROM records
            WHERE owner_id = ?1 AND kind = ?2
            ORDER BY occurred_on DESC, created_at DESC, rowid DESC
        ",
    )
    .bind(owner.to_string())
    .bind(kind.as_str())
    .fetch_all(pool)
    .await
}

pub async fn list_by_owner_since(
    pool: &SqlitePool,
    kind: RecordKind,
    owner: Uuid,
    cutoff: NaiveDate,
) -> Result<Vec<Record>, sqlx::Error> {
    sqlx::query_as::<_, Record>(
        "
            SELECT * FROM records
            WHERE owner_id = ?1 AND kind = ?2 AND occurred_on >= ?3
            ORDER BY occurred_on DESC, created_at DESC, rowid DESC
        ",
    )
    .bind(owner.to_string())
    .bind(kind.as_str())
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

pub async fn list_recent_by_owner(
    pool: &SqlitePool,
    kind: RecordKind,
    owner: Uuid,
    limit: u32,
) -> Result<Vec<Record>, sqlx::Error> {
    sqlx::query_as::<_, Record>(
        "
            SELECT * FROM records
            WHERE owner_id = ?1 AND kind = ?2
            ORDER BY occurred_on DESC, created_at DESC, rowid DESC
            LIMIT ?3
        ",
    )
    .bind(owner.to_string())
    .bind(kind.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn sum_by_owner(
    pool: &SqlitePool,
    kind: RecordKind,
    owner: Uuid,
) -> Result<Decimal, sqlx::Error> {
    // Amounts are stored as TEXT and summed here as decimals. SUM() in
    // SQLite would coerce them to floats and drift on cent values.
    let amounts: Vec<(String,)> = sqlx::query_as(
        "
            SELECT amount FROM records
            WHERE owner_id = ?1 AND kind = ?2
        ",
    )
    .bind(owner.to_string())
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;

    let mut total = Decimal::ZERO;
    for (raw,) in amounts {
        let amount = raw
            .parse::<Decimal>()
            .map_err(|err| sqlx::Error::ColumnDecode {
                index: "amount".to_string(),
                source: Box::new(err),
            })?;
        total += amount;
    }

    Ok(total)
}

pub async fn delete_by_owner(
    pool: &SqlitePool,
    kind: RecordKind,
    id: Uuid,
    owner: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "
            DELETE FROM records
            WHERE id = ?1 AND owner_id = ?2 AND kind = ?3
        ",
    )
    .bind(id.to_string())
    .bind(owner.to_string())
    .bind(kind.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_user(
    pool: &SqlitePool,
    user: &User,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        "
            INSERT INTO users (
                id,
                email,
                password_hash,
                created_at
            ) VALUES (?1, ?2, ?3, ?4)
        ",
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await
}

pub async fn find_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "
            SELECT * FROM users
            WHERE email = ?1
        ",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "
            SELECT * FROM users
            WHERE id = ?1
        ",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}
