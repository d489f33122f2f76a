use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, build_app_state, AppState, ClimateData, Error, PrecipitationRecord, StationRecord,
    TemperatureRangeStats, TemperatureRecord, TemperatureStats,
};
use hyper::Method;
use mockall::mock;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr, sync::Arc};
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}

    #[async_trait::async_trait]
    impl ClimateData for ClimateAccess {
        async fn precipitation(&self) -> Result<Vec<PrecipitationRecord>, Error>;
        async fn stations(&self) -> Result<Vec<StationRecord>, Error>;
        async fn temperature_observations(&self) -> Result<Vec<TemperatureRecord>, Error>;
        async fn temperature_stats_from(&self, start: &str) -> Result<TemperatureStats, Error>;
        async fn temperature_stats_between(
            &self,
            start: &str,
            end: &str,
        ) -> Result<TemperatureRangeStats, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

/// Router wired to a mocked data layer.
pub fn spawn_app(climate_db: Arc<dyn ClimateData>) -> TestApp {
    let state = AppState {
        remote_url: "http://localhost:9700".to_string(),
        climate_db,
    };

    TestApp { app: app(state) }
}

/// Router backed by a real SQLite file seeded with the given rows.
///
/// Station tuples are (station, name, latitude, longitude, elevation).
/// Measurement tuples are (station, date, prcp, tobs); prcp is text so
/// the literal "None" marker can be represented.
pub async fn spawn_seeded_app(
    dir: &Path,
    stations: &[(&str, &str, f64, f64, f64)],
    measurements: &[(&str, &str, &str, f64)],
) -> TestApp {
    let db_path = dir.join("climate.sqlite");
    seed_database(&db_path, stations, measurements).await;

    let state = build_app_state(
        "http://localhost:9700".to_string(),
        db_path.to_str().unwrap(),
    )
    .await
    .expect("Failed to build app state.");

    TestApp { app: app(state) }
}

async fn seed_database(
    path: &Path,
    stations: &[(&str, &str, f64, f64, f64)],
    measurements: &[(&str, &str, &str, f64)],
) {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to create seed database.");

    sqlx::query(
        "CREATE TABLE station (
            station TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            elevation REAL NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station TEXT NOT NULL,
            date TEXT NOT NULL,
            prcp TEXT,
            tobs REAL NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    for &(station, name, latitude, longitude, elevation) in stations {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(station)
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(elevation)
        .execute(&pool)
        .await
        .unwrap();
    }

    for &(station, date, prcp, tobs) in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(station)
            .bind(date)
            .bind(prcp)
            .bind(tobs)
            .execute(&pool)
            .await
            .unwrap();
    }

    pool.close().await;
}

/// Issue a GET against the in-process router and decode the JSON body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).expect("response body was not JSON");

    (status, value)
}
