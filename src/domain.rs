use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};
use sqlx::{FromRow, Row, sqlite::SqliteRow};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    pub fn label_field(self) -> &'static str {
        match self {
            RecordKind::Income => "source",
            RecordKind::Expense => "category",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub owner: Uuid,
    pub kind: RecordKind,
    pub label: String,
    pub amount: Decimal,
    pub occurred_on: NaiveDate,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The label key depends on the kind: income carries "source",
        // expense carries "category".
        let mut state = serializer.serialize_struct("Record", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field(self.kind.label_field(), &self.label)?;
        state.serialize_field("amount", &self.amount)?;
        state.serialize_field("occurredOn", &self.occurred_on)?;
        state.serialize_field("icon", &self.icon)?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.serialize_field("updatedAt", &self.updated_at)?;
        state.end()
    }
}

fn column_decode<E>(column: &str, source: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl FromRow<'_, SqliteRow> for Record {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner: String = row.try_get("owner_id")?;
        let kind: String = row.try_get("kind")?;
        let amount: String = row.try_get("amount")?;

        let kind = match kind.as_str() {
            "income" => RecordKind::Income,
            "expense" => RecordKind::Expense,
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "kind".to_string(),
                    source: format!("unknown record kind '{}'", other).into(),
                });
            }
        };

        Ok(Record {
            id: Uuid::parse_str(&id).map_err(|err| column_decode("id", err))?,
            owner: Uuid::parse_str(&owner).map_err(|err| column_decode("owner_id", err))?,
            kind,
            label: row.try_get("label")?,
            amount: amount
                .parse::<Decimal>()
                .map_err(|err| column_decode("amount", err))?,
            occurred_on: row.try_get("occurred_on")?,
            icon: row.try_get("icon")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(User {
            id: Uuid::parse_str(&id).map_err(|err| column_decode("id", err))?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub last_30_days_expenses: WindowReport,
    pub last_60_days_income: WindowReport,
    pub recent_transactions: Vec<Record>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WindowReport {
    pub total: Decimal,
    pub transactions: Vec<Record>,
}
