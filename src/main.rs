use std::sync::Arc;

use finboard::{
    AppState,
    args::parse_args,
    db::{create_pool, init_schema},
    logging::setup_logging,
    routes,
};

#[tokio::main]
async fn main() {
    let args = parse_args();

    setup_logging(&args.base_log_dir);

    let pool = create_pool(&args.database_url)
        .await
        .expect("Failed to create SQLite pool");

    init_schema(&pool)
        .await
        .expect("Failed to initialise database schema");

    let app_state = Arc::new(AppState {
        pool,
        jwt_secret: args.jwt_secret,
        classifier_url: args.classifier_url,
        classifier_api_key: args.classifier_api_key,
        classifier_timeout: args.classifier_timeout,
    });

    let app = routes::app(app_state);

    let bind_address = format! {"0.0.0.0:{}", args.port};
    tracing::info!("Server listening on {}...", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
