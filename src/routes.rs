use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{AppState, auth, handlers};

// build our application from the public routes and the protected ones
pub fn app(state: Arc<AppState>) -> Router {
    // routes on this router sit behind the bearer token middleware
    let protected = Router::new()
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/classify", post(handlers::classify_description))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/{kind}",
            post(handlers::create_record).get(handlers::list_records),
        )
        .route("/api/{kind}/export", get(handlers::export_records))
        .route("/api/{kind}/{id}", delete(handlers::delete_record))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/", get(|| async { "finboard is running" }))
        .merge(protected)
        .with_state(state)
}
