mod support;

use std::time::Duration;

use mockito::Matcher;
use slotwatch::adapter::outbound::scraper::http::create_client;
use slotwatch::adapter::outbound::scraper::{CvsScraper, HttpSettings, MaImmunizationsScraper};
use slotwatch::port::Scraper;
use support::memory_state;

const CLINICS: &str = include_str!("fixtures/ma_immunizations.html");
const WAITING: &str = include_str!("fixtures/ma_immunizations_waiting.html");

fn settings() -> HttpSettings {
    HttpSettings {
        page_delay: Duration::ZERO,
        page_jitter: Duration::ZERO,
        ..HttpSettings::default()
    }
}

fn ma_scraper(base_url: &str) -> MaImmunizationsScraper {
    let settings = settings();
    let client = create_client(&settings).unwrap();
    MaImmunizationsScraper::with_base_url(client, settings, base_url)
        .with_waiting_room_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn ma_scraper_merges_listings_and_caches_session() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", Matcher::Regex("^/clinic/search".to_string()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_header("set-cookie", "_session=abc; Max-Age=1800; Path=/")
        .with_body(CLINICS)
        .expect(3)
        .create_async()
        .await;

    let (memory, state) = memory_state();
    let scraper = ma_scraper(&server.url());

    let clinics = scraper.all_clinics(&state).await.unwrap();
    assert_eq!(clinics.len(), 2);
    assert_eq!(clinics[0].appointments(), 100);
    assert_eq!(clinics[1].appointments(), 0);
    assert!(clinics[1].link().is_none());
    assert!(memory
        .snapshot()
        .contains_key("vaccine-cookies:ma-immunization"));

    // Second pass reuses the cached cookies: one request instead of two.
    let clinics = scraper.all_clinics(&state).await.unwrap();
    assert_eq!(clinics.len(), 2);

    search.assert_async().await;
}

#[tokio::test]
async fn ma_scraper_gives_up_in_the_waiting_room() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", Matcher::Regex("^/clinic/search".to_string()))
        .with_status(200)
        .with_body(WAITING)
        .expect(14)
        .create_async()
        .await;

    let (_, state) = memory_state();
    let clinics = ma_scraper(&server.url()).all_clinics(&state).await.unwrap();

    assert!(clinics.is_empty());
    search.assert_async().await;
}

#[tokio::test]
async fn ma_scraper_fails_when_first_page_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/clinic/search".to_string()))
        .with_status(503)
        .create_async()
        .await;

    let (_, state) = memory_state();
    assert!(ma_scraper(&server.url()).all_clinics(&state).await.is_err());
}

#[tokio::test]
async fn cvs_scraper_rolls_up_available_cities() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "akavpau=xyz; Path=/")
        .create_async()
        .await;
    let status = server
        .mock("GET", Matcher::Regex("vaccine-status\\.MA\\.json".to_string()))
        .match_header("cookie", "akavpau=xyz")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"responsePayloadData":{"data":{"MA":[
                {"city":"BOSTON","state":"MA","status":"Available"},
                {"city":"LYNN","state":"MA","status":"Fully Booked"},
                {"city":"SALEM","state":"MA","status":"Available"}
            ]}}}"#,
        )
        .create_async()
        .await;

    let client = create_client(&settings()).unwrap();
    let scraper = CvsScraper::with_base_url(client, "MA", server.url());
    let (_, state) = memory_state();

    let clinics = scraper.all_clinics(&state).await.unwrap();
    assert_eq!(clinics.len(), 1);
    assert_eq!(clinics[0].title(), "CVS stores in MA");
    assert_eq!(clinics[0].appointments(), 2);
    assert_eq!(clinics[0].storage_key(), "CVS-MA");

    status.assert_async().await;
}

#[tokio::test]
async fn cvs_scraper_surfaces_server_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("vaccine-status".to_string()))
        .with_status(500)
        .create_async()
        .await;

    let client = create_client(&settings()).unwrap();
    let scraper = CvsScraper::with_base_url(client, "MA", server.url());
    let (_, state) = memory_state();

    assert!(scraper.all_clinics(&state).await.is_err());
}
