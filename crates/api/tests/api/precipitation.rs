use crate::helpers::{get_json, spawn_app, spawn_seeded_app, MockClimateAccess};
use climate_api::PrecipitationRecord;
use std::sync::Arc;

const WAIKIKI: (&str, &str, f64, f64, f64) =
    ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0);

/// Rows whose prcp column holds the literal string "None" are filtered
/// out, leaving only real readings.
#[tokio::test]
async fn excludes_rows_marked_none() {
    let dir = tempfile::tempdir().unwrap();
    let test_app = spawn_seeded_app(
        dir.path(),
        &[WAIKIKI],
        &[
            ("USC00519397", "2017-08-23", "0.1", 80.0),
            ("USC00519397", "2017-08-22", "None", 78.0),
        ],
    )
    .await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert!(status.is_success());
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["date"], "2017-08-23");
    assert_eq!(records[0]["precp"], "0.1");
}

/// The window is one calendar year back from the dataset's latest date:
/// same month and day, previous year, inclusive on both ends.
#[tokio::test]
async fn window_is_one_calendar_year_back_from_max_date() {
    let dir = tempfile::tempdir().unwrap();
    let test_app = spawn_seeded_app(
        dir.path(),
        &[WAIKIKI],
        &[
            ("USC00519397", "2017-08-23", "0.7", 81.0),
            ("USC00519397", "2017-01-15", "0.2", 74.0),
            ("USC00519397", "2016-08-23", "0.0", 79.0),
            // One day before the window opens.
            ("USC00519397", "2016-08-22", "1.3", 76.0),
        ],
    )
    .await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert!(status.is_success());
    let mut dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["date"].as_str().unwrap())
        .collect();
    dates.sort_unstable();

    assert_eq!(dates, vec!["2016-08-23", "2017-01-15", "2017-08-23"]);
    for date in dates {
        assert!(("2016-08-23".."2017-08-24").contains(&date));
    }
}

/// The response keys are `date` and `precp` - the misspelling is part of
/// the wire format even though the route is named "precipitation".
#[tokio::test]
async fn records_serialize_with_the_precp_key() {
    let mut climate_db = MockClimateAccess::new();

    climate_db.expect_precipitation().times(1).returning(|| {
        Ok(vec![PrecipitationRecord {
            date: "2017-08-23".to_string(),
            precipitation: "0.45".to_string(),
        }])
    });

    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert!(status.is_success());
    let record = &body.as_array().unwrap()[0];
    let keys: Vec<&str> = record
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(keys, vec!["date", "precp"]);
    assert!(record.get("precipitation").is_none());
}
