use crate::{
    precipitation, routes, start_end_stats, start_stats, station, tobs, welcome_handler,
    ClimateData, ClimateDb, PrecipitationRecord, StationRecord, TemperatureRangeStats,
    TemperatureRecord, TemperatureStats,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::observations::precipitation,
        routes::observations::station,
        routes::observations::tobs,
        routes::observations::start_stats,
        routes::observations::start_end_stats,
    ),
    components(
        schemas(
                PrecipitationRecord,
                StationRecord,
                TemperatureRecord,
                TemperatureStats,
                TemperatureRangeStats
            )
    ),
    tags(
        (name = "climate observations api", description = "a read-only RESTful api over daily precipitation and temperature readings")
    )
)]
struct ApiDoc;

pub async fn build_app_state(remote_url: String, database: &str) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateDb::new(database)
            .await
            .map_err(|e| anyhow!("error opening climate database: {}", e))?,
    );

    Ok(AppState {
        remote_url,
        climate_db,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // UI route
        .route("/", get(welcome_handler))
        // API routes; the static segments win over the {start} capture
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/station", get(station))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(start_stats))
        .route("/api/v1.0/{start}/{end}", get(start_end_stats))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
