use crate::helpers::{get_json, spawn_app, spawn_seeded_app, MockClimateAccess};
use std::sync::Arc;

/// Every element of the station list carries exactly the four public
/// keys; elevation stays internal to the dataset.
#[tokio::test]
async fn every_station_has_exactly_four_keys() {
    let dir = tempfile::tempdir().unwrap();
    let test_app = spawn_seeded_app(
        dir.path(),
        &[
            ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
            ("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
        ],
        &[("USC00519397", "2017-08-23", "0.0", 81.0)],
    )
    .await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/station").await;

    assert!(status.is_success());
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);

    for record in records {
        let object = record.as_object().unwrap();
        assert_eq!(object.len(), 4);
        for key in ["name", "station", "latitude", "longitude"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert!(!object.contains_key("elevation"));
    }
}

/// Station values come through unchanged from the dataset.
#[tokio::test]
async fn station_values_match_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let test_app = spawn_seeded_app(
        dir.path(),
        &[("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0)],
        &[("USC00519397", "2017-08-23", "0.0", 81.0)],
    )
    .await;

    let (_, body) = get_json(&test_app.app, "/api/v1.0/station").await;

    let record = &body.as_array().unwrap()[0];
    assert_eq!(record["name"], "WAIKIKI 717.2, HI US");
    assert_eq!(record["station"], "USC00519397");
    assert_eq!(record["latitude"], 21.2716);
    assert_eq!(record["longitude"], -157.8168);
}

/// An empty station table is an empty array, not an error.
#[tokio::test]
async fn empty_station_list_is_an_empty_array() {
    let mut climate_db = MockClimateAccess::new();

    climate_db.expect_stations().times(1).returning(|| Ok(vec![]));

    let test_app = spawn_app(Arc::new(climate_db));

    let (status, body) = get_json(&test_app.app, "/api/v1.0/station").await;

    assert!(status.is_success());
    assert_eq!(body.as_array().unwrap().len(), 0);
}
