use async_trait::async_trait;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row, SqliteConnection,
};
use std::{path::Path, str::FromStr, time::Duration};
use time::{format_description::FormatItem, macros::format_description, Date};

use super::{
    ClimateData, Error, PrecipitationRecord, StationRecord, TemperatureRangeStats,
    TemperatureRecord, TemperatureStats,
};

/// Dates are stored as yyyy-mm-dd text, so lexicographic comparison in
/// SQL matches chronological order and range parameters can stay strings.
const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub struct ClimateDb {
    pool: SqlitePool,
}

impl ClimateDb {
    /// Open the pre-populated climate data file read-only.
    ///
    /// Fails when the file does not exist or lacks the expected tables,
    /// which keeps the process from starting against the wrong data.
    pub async fn new(path: &str) -> Result<Self, Error> {
        if !Path::new(path).exists() {
            return Err(Error::MissingDatabase(path.to_string()));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.verify_schema().await?;
        info!("Climate database opened read-only at: {}", path);

        Ok(db)
    }

    async fn verify_schema(&self) -> Result<(), Error> {
        for table in ["measurement", "station"] {
            let found: Option<(String,)> =
                sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                    .bind(table)
                    .fetch_optional(&self.pool)
                    .await?;

            if found.is_none() {
                return Err(Error::MissingTable(table));
            }
        }
        Ok(())
    }

    /// Latest observation date in the dataset. The dataset is assumed
    /// non-empty; an empty measurement table fails the request.
    async fn max_measurement_date(conn: &mut SqliteConnection) -> Result<String, Error> {
        let row: (String,) = sqlx::query_as("SELECT MAX(date) FROM measurement")
            .fetch_one(conn)
            .await?;
        Ok(row.0)
    }

    /// Station with the highest measurement count. SQLite returns rows
    /// with equal counts in an unspecified order and we take the first
    /// as-is; ties are not broken deterministically.
    async fn most_active_station(conn: &mut SqliteConnection) -> Result<String, Error> {
        let row: (String, i64) = sqlx::query_as(
            "SELECT station, COUNT(station) AS observation_count
             FROM measurement
             GROUP BY station
             ORDER BY observation_count DESC
             LIMIT 1",
        )
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT).map_err(|e| Error::DateParse(e, text.to_string()))
}

/// Same month and day, one year earlier. Errors for Feb 29 when the
/// prior year is not a leap year; that surfaces as a request failure
/// instead of silently shifting the window.
fn one_calendar_year_before(date: Date) -> Result<Date, Error> {
    date.replace_year(date.year() - 1)
        .map_err(|e| Error::YearSubtraction(date, e))
}

/// The temperature route counts a year as exactly 365 days, unlike the
/// precipitation route's calendar-year rule. The two windows diverge
/// around leap years and are kept separate on purpose.
fn days_365_before(date: Date) -> Date {
    date - time::Duration::days(365)
}

#[async_trait]
impl ClimateData for ClimateDb {
    async fn precipitation(&self) -> Result<Vec<PrecipitationRecord>, Error> {
        let mut conn = self.pool.acquire().await?;

        let max_date = Self::max_measurement_date(&mut conn).await?;
        let last = parse_date(&max_date)?;
        let year_ago = one_calendar_year_before(last)?.format(DATE_FORMAT)?;

        let rows = sqlx::query(
            "SELECT date, prcp FROM measurement
             WHERE prcp != 'None' AND date >= ? AND date <= ?",
        )
        .bind(&year_ago)
        .bind(&max_date)
        .fetch_all(&mut *conn)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(PrecipitationRecord {
                date: row.get("date"),
                precipitation: row.get("prcp"),
            });
        }
        Ok(records)
    }

    async fn stations(&self) -> Result<Vec<StationRecord>, Error> {
        let rows = sqlx::query("SELECT name, station, latitude, longitude FROM station")
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(StationRecord {
                name: row.get("name"),
                station: row.get("station"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
            });
        }
        Ok(records)
    }

    async fn temperature_observations(&self) -> Result<Vec<TemperatureRecord>, Error> {
        let mut conn = self.pool.acquire().await?;

        let station = Self::most_active_station(&mut conn).await?;
        let max_date = Self::max_measurement_date(&mut conn).await?;
        let last = parse_date(&max_date)?;
        let year_ago = days_365_before(last).format(DATE_FORMAT)?;

        let rows = sqlx::query(
            "SELECT date, tobs FROM measurement
             WHERE station = ? AND date >= ? AND date <= ?",
        )
        .bind(&station)
        .bind(&year_ago)
        .bind(&max_date)
        .fetch_all(&mut *conn)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(TemperatureRecord {
                date: row.get("date"),
                temperature: row.get("tobs"),
            });
        }
        Ok(records)
    }

    async fn temperature_stats_from(&self, start: &str) -> Result<TemperatureStats, Error> {
        let row = sqlx::query(
            "SELECT MIN(date) AS start_date, MIN(tobs) AS min_temp,
                    AVG(tobs) AS avg_temp, MAX(tobs) AS max_temp
             FROM measurement
             WHERE date >= ?",
        )
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        Ok(TemperatureStats {
            start_date: row.get("start_date"),
            min_temp: row.get("min_temp"),
            avg_temp: row.get("avg_temp"),
            max_temp: row.get("max_temp"),
        })
    }

    async fn temperature_stats_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureRangeStats, Error> {
        let row = sqlx::query(
            "SELECT MIN(date) AS start_date, MAX(date) AS end_date,
                    MIN(tobs) AS min_temp, AVG(tobs) AS avg_temp, MAX(tobs) AS max_temp
             FROM measurement
             WHERE date >= ? AND date <= ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(TemperatureRangeStats {
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            min_temp: row.get("min_temp"),
            avg_temp: row.get("avg_temp"),
            max_temp: row.get("max_temp"),
        })
    }
}
