use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    classify, db,
    domain::{Record, RecordKind, Summary},
    export,
    summary::compute_summary,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotAuthenticated(String),
    NotFound,
    Database,
    Internal,
}

impl From<sqlx::Error> for AppError {
    fn from(_err: sqlx::Error) -> Self {
        AppError::Database
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => {
                tracing::info!("Rejected request: {}", &message);
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotAuthenticated(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Database => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (
            status,
            Json(serde_json::json!({ "message": error_message })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordPayload {
    pub source: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyPayload {
    pub description: Option<String>,
}

#[axum::debug_handler]
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<RecordKind>,
    Json(payload): Json<CreateRecordPayload>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let label = match kind {
        RecordKind::Income => payload.source,
        RecordKind::Expense => payload.category,
    };
    let label = label.unwrap_or_default().trim().to_string();
    if label.is_empty() {
        return Err(AppError::Validation(format!(
            "{} is required",
            kind.label_field()
        )));
    }

    let amount = payload
        .amount
        .ok_or_else(|| AppError::Validation(String::from("amount is required")))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(String::from(
            "amount must be greater than 0",
        )));
    }

    let now = Utc::now();
    let record = Record {
        id: Uuid::new_v4(),
        owner: user.user_id,
        kind,
        label,
        amount,
        occurred_on: payload.date.unwrap_or_else(|| now.date_naive()),
        icon: payload.icon,
        created_at: now,
        updated_at: now,
    };

    db::insert_record(&state.pool, &record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[axum::debug_handler]
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<RecordKind>,
) -> Result<Json<DataResponse<Vec<Record>>>, AppError> {
    let records = db::list_by_owner(&state.pool, kind, user.user_id)
        .await
        .inspect_err(|err| {
            tracing::error!(
                "Error occurred while querying {} records: {:#?}",
                kind.as_str(),
                err
            );
        })?;

    Ok(Json(DataResponse { data: records }))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(RecordKind, Uuid)>,
) -> Result<StatusCode, AppError> {
    let deleted = db::delete_by_owner(&state.pool, kind, id, user.user_id)
        .await
        .inspect_err(|err| {
            tracing::error!(
                "Error occurred while deleting {} record with ID {}: {:#?}",
                kind.as_str(),
                id,
                err
            );
        })?;

    // A record owned by someone else reports the same way as an absent one.
    if deleted == 0 {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Summary>, AppError> {
    let summary = compute_summary(&state.pool, user.user_id, Utc::now())
        .await
        .inspect_err(|err| {
            tracing::error!(
                "Error occurred while computing summary for user {}: {:#?}",
                user.user_id,
                err
            );
        })?;

    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn export_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<RecordKind>,
) -> Result<Response, AppError> {
    let records = db::list_by_owner(&state.pool, kind, user.user_id)
        .await
        .inspect_err(|err| {
            tracing::error!(
                "Error occurred while querying {} records for export: {:#?}",
                kind.as_str(),
                err
            );
        })?;

    let body = export::records_to_csv(kind, &records).map_err(|err| {
        tracing::error!(
            "Error occurred while writing {} records to CSV: {:#?}",
            kind.as_str(),
            err
        );
        AppError::Internal
    })?;

    let disposition = format!("attachment; filename=\"{}\"", export::export_filename(kind));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                String::from("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn classify_description(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<ClassifyPayload>,
) -> Result<Json<classify::Classification>, AppError> {
    let description = payload.description.unwrap_or_default().trim().to_string();
    if description.chars().count() < 3 {
        return Err(AppError::Validation(String::from(
            "description must be at least 3 characters",
        )));
    }

    let result = classify::classify(
        &state.classifier_url,
        state.classifier_api_key.as_deref(),
        std::time::Duration::from_secs(state.classifier_timeout),
        &description,
    )
    .await;

    Ok(Json(result))
}
