//! Fetching disabled parking spaces across both result pages.

use std::collections::HashSet;

use antwerpen::{Client, Coordinates, DisabledParking, Error, ErrorKind, Position};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_0: &str = include_str!("fixtures/disabled_parking.geojson");
const PAGE_1000: &str = include_str!("fixtures/disabled_parking_page2.geojson");
const QUERY_PATH: &str = "/arcgissql/rest/services/P_Portal/portal_publiek6/MapServer/585/query";

async fn mount_page(server: &MockServer, offset: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("where", "1=1"))
        .and(query_param("resultOffset", offset))
        .and(query_param("outFields", "*"))
        .and(query_param("f", "geojson"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn geojson(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/geo+json")
}

async fn two_page_server() -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, "0", geojson(PAGE_0)).await;
    mount_page(&server, "1000", geojson(PAGE_1000)).await;
    server
}

fn client_for(server: &MockServer) -> Client {
    Client::default().with_base_url(format!(
        "{}/arcgissql/rest/services/P_Portal/",
        server.uri()
    ))
}

fn ids(parkings: &[DisabledParking]) -> Vec<Option<i64>> {
    parkings.iter().map(|p| p.entry_id).collect()
}

#[tokio::test]
async fn all_disabled_parking_spaces() {
    let server = two_page_server().await;
    let client = client_for(&server);

    let spaces = client.disabled_parkings(100).await.unwrap();
    assert_eq!(ids(&spaces), [Some(42), Some(43), Some(44), Some(1043), Some(1044)]);
    for item in &spaces {
        assert!(item.entry_id.is_some());
    }
    let unique: HashSet<_> = spaces.iter().map(|p| p.entry_id).collect();
    assert_eq!(unique.len(), spaces.len());

    client.close();
}

#[tokio::test]
async fn default_limit_exceeds_available_records() {
    let server = two_page_server().await;
    let spaces = client_for(&server)
        .disabled_parkings(antwerpen::DEFAULT_LIMIT)
        .await
        .unwrap();
    assert_eq!(spaces.len(), 5);
}

// `expect(1)` on both page mocks is verified when the server drops.
#[tokio::test]
async fn limit_truncates_but_both_pages_are_fetched() {
    let server = two_page_server().await;
    let spaces = client_for(&server).disabled_parkings(2).await.unwrap();
    assert_eq!(ids(&spaces), [Some(42), Some(43)]);
}

#[tokio::test]
async fn limit_zero_returns_nothing() {
    let server = two_page_server().await;
    let spaces = client_for(&server).disabled_parkings(0).await.unwrap();
    assert!(spaces.is_empty());
}

#[tokio::test]
async fn fixture_records_are_mapped() {
    let server = two_page_server().await;
    let spaces = client_for(&server).disabled_parkings(5).await.unwrap();

    let first = &spaces[0];
    assert_eq!(first.number, Some(2));
    assert!(first.lined);
    assert_eq!(first.gis_id.as_deref(), Some("MPV_00042"));
    assert_eq!(
        first.created_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2023-11-14T23:13:20+01:00")
    );
    let Some(Coordinates::Ring(ring)) = &first.coordinates else {
        panic!("expected a ring, got {:?}", first.coordinates);
    };
    assert_eq!(ring.len(), 4);
    assert_eq!(ring[0], Position::new(4.4001, 51.2101));

    let second = &spaces[1];
    assert!(!second.lined);
    assert_eq!(second.window_time.as_deref(), Some("ma-vr 8u-18u"));
    assert_eq!(second.created_at, None);

    // Partial data degrades to empty fields.
    let third = &spaces[2];
    assert_eq!(third.number, None);
    assert_eq!(third.created_at, None);
    assert_eq!(third.coordinates, None);
    assert_eq!(third.status.as_deref(), Some("Gepland"));

    assert_eq!(
        spaces[4].coordinates,
        Some(Coordinates::Point(Position::new(4.3901, 51.2001)))
    );
    assert_eq!(spaces[4].created_at, None);
}

#[tokio::test]
async fn failing_second_page_fails_the_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "0", geojson(PAGE_0)).await;
    mount_page(&server, "1000", ResponseTemplate::new(500)).await;

    let err = client_for(&server).disabled_parkings(3).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn response_without_features_is_a_data_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(geojson(r#"{"error": {"code": 400, "message": "Invalid query"}}"#))
        .mount(&server)
        .await;

    let err = client_for(&server).disabled_parkings(10).await.unwrap_err();
    assert!(
        matches!(err, Error::Data(antwerpen::DataError::InvalidFeatureCollection(_))),
        "got {err:?}"
    );
}
