use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::error;
use std::sync::Arc;

use crate::{
    AppState, PrecipitationRecord, StationRecord, TemperatureRangeStats, TemperatureRecord,
    TemperatureStats,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings for the final calendar year of data", body = Vec<PrecipitationRecord>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query precipitation readings")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationRecord>>, (StatusCode, String)> {
    let records = state.climate_db.precipitation().await.map_err(|err| {
        error!("error querying precipitation: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to query precipitation: {}", err),
        )
    })?;

    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/station",
    responses(
        (status = OK, description = "All stations in the dataset", body = Vec<StationRecord>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query stations")
    ))]
pub async fn station(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationRecord>>, (StatusCode, String)> {
    let records = state.climate_db.stations().await.map_err(|err| {
        error!("error querying stations: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to query stations: {}", err),
        )
    })?;

    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station over the final 365 days of data", body = Vec<TemperatureRecord>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperature observations")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureRecord>>, (StatusCode, String)> {
    let records = state
        .climate_db
        .temperature_observations()
        .await
        .map_err(|err| {
            error!("error querying temperature observations: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query temperature observations: {}", err),
            )
        })?;

    Ok(Json(records))
}

/// The start segment is taken as an opaque string and compared
/// lexicographically against the stored yyyy-mm-dd dates; anything that
/// is not a date simply aggregates over an empty set.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Start date (yyyy-mm-dd), inclusive"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature over all dates on or after the start date", body = Vec<TemperatureStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperature statistics")
    ))]
pub async fn start_stats(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, (StatusCode, String)> {
    let stats = state
        .climate_db
        .temperature_stats_from(&start)
        .await
        .map_err(|err| {
            error!("error querying temperature stats from {}: {}", start, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query temperature statistics: {}", err),
            )
        })?;

    Ok(Json(vec![stats]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Start date (yyyy-mm-dd), inclusive"),
        ("end" = String, Path, description = "End date (yyyy-mm-dd), inclusive"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature over the inclusive date range", body = Vec<TemperatureRangeStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperature statistics")
    ))]
pub async fn start_end_stats(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureRangeStats>>, (StatusCode, String)> {
    let stats = state
        .climate_db
        .temperature_stats_between(&start, &end)
        .await
        .map_err(|err| {
            error!(
                "error querying temperature stats between {} and {}: {}",
                start, end, err
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query temperature statistics: {}", err),
            )
        })?;

    Ok(Json(vec![stats]))
}
