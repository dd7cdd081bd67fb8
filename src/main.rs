use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use newswire::{api, app_state::AppState, config::Config, health};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let bind_addr = config.bind_addr().to_string();
    let state = AppState::new(pool, config);

    let app = Router::new()
        .route("/healthz", get(health::health_check))
        .route(
            "/api/ingest",
            post(api::handlers::trigger_ingest).get(api::handlers::trigger_ingest),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
