use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    db::{find_user_by_email, find_user_by_id, insert_user},
    domain::User,
    handlers::AppError,
};

pub const TOKEN_TTL_HOURS: i64 = 24;
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(
    password: &str,
    stored_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn encode_jwt(user_id: Uuid, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!("Error encoding JWT: {:#?}", err);
        AppError::Internal
    })
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| AppError::NotAuthenticated(format!("invalid token: {}", err)))?;

    Ok(data.claims)
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::NotAuthenticated(String::from("missing Authorization header")))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::NotAuthenticated(String::from("invalid Authorization scheme")))?;

    let claims = decode_jwt(token, &state.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::NotAuthenticated(String::from("invalid subject in token")))?;

    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email = payload.email.unwrap_or_default().trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(String::from("a valid email is required")));
    }

    let password = payload.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let password_hash = hash_password(&password).map_err(|err| {
        tracing::error!("Error hashing password during registration: {:#?}", err);
        AppError::Internal
    })?;

    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash,
        created_at: Utc::now(),
    };

    insert_user(&state.pool, &user).await.map_err(|err| {
        if err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation())
        {
            AppError::Validation(String::from("email is already registered"))
        } else {
            tracing::error!("Error inserting user during registration: {:#?}", err);
            AppError::Database
        }
    })?;

    tracing::info!("Registered user with ID {}", &user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id: user.id }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.unwrap_or_default().trim().to_string();
    let password = payload.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(String::from(
            "email and password are required",
        )));
    }

    let user = find_user_by_email(&state.pool, &email)
        .await
        .inspect_err(|err| {
            tracing::error!("Error occurred while querying user in login: {:#?}", err);
        })?;

    let Some(user) = user else {
        return Err(AppError::NotAuthenticated(String::from(
            "invalid email or password",
        )));
    };

    let is_valid = verify_password(&password, &user.password_hash).map_err(|err| {
        tracing::error!("Error verifying password in login: {:#?}", err);
        AppError::Internal
    })?;
    if !is_valid {
        return Err(AppError::NotAuthenticated(String::from(
            "invalid email or password",
        )));
    }

    let token = encode_jwt(user.id, &state.jwt_secret)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let row = find_user_by_id(&state.pool, user.user_id)
        .await
        .inspect_err(|err| {
            tracing::error!("Error occurred while querying user in me: {:#?}", err);
        })?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse {
        id: row.id,
        email: row.email,
        created_at: row.created_at,
    }))
}
