mod sqlite;

pub use sqlite::ClimateDb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to parse stored date '{1}': {0}")]
    DateParse(time::error::Parse, String),
    #[error("No same-day date one year before {0}: {1}")]
    YearSubtraction(time::Date, time::error::ComponentRange),
    #[error("Climate database file not found: {0}")]
    MissingDatabase(String),
    #[error("Climate database is missing expected table '{0}'")]
    MissingTable(&'static str),
}

/// Read-only access to the climate observations dataset.
///
/// One implementation backed by SQLite ships with the service; tests
/// substitute mocks at this seam.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// Precipitation readings for the final calendar year of data,
    /// excluding rows recorded as the literal string "None".
    async fn precipitation(&self) -> Result<Vec<PrecipitationRecord>, Error>;

    /// Every station in the dataset.
    async fn stations(&self) -> Result<Vec<StationRecord>, Error>;

    /// Temperature readings from the most active station over the
    /// 365 days ending at the dataset's latest date.
    async fn temperature_observations(&self) -> Result<Vec<TemperatureRecord>, Error>;

    /// Min/avg/max temperature over all dates >= `start`.
    async fn temperature_stats_from(&self, start: &str) -> Result<TemperatureStats, Error>;

    /// Min/avg/max temperature over all dates in [`start`, `end`].
    async fn temperature_stats_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureRangeStats, Error>;
}

/// One daily precipitation reading.
///
/// The wire key `precp` predates this service; clients already depend
/// on the spelling, so it stays even though the route is named
/// "precipitation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrecipitationRecord {
    pub date: String,
    #[serde(rename = "precp")]
    pub precipitation: String,
}

/// Station metadata. Elevation is stored in the dataset but not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationRecord {
    pub name: String,
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One daily temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureRecord {
    pub date: String,
    pub temperature: f64,
}

/// Aggregate temperature statistics for an open-ended range.
///
/// `start_date` is MIN(date) over the matching rows, not an echo of the
/// request parameter. Every field is null when nothing matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "start date")]
    pub start_date: Option<String>,
    #[serde(rename = "min temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "avg temp")]
    pub avg_temp: Option<f64>,
    #[serde(rename = "max temp")]
    pub max_temp: Option<f64>,
}

/// Aggregate temperature statistics for a bounded range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureRangeStats {
    #[serde(rename = "start date")]
    pub start_date: Option<String>,
    #[serde(rename = "end date")]
    pub end_date: Option<String>,
    #[serde(rename = "min temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "avg temp")]
    pub avg_temp: Option<f64>,
    #[serde(rename = "max temp")]
    pub max_temp: Option<f64>,
}
