use std::time::Duration;

use ao3tagbot_common::{models::StoryId, StatusCode};
use ao3tagbot_scrape::{Fetch, FetchError, Fetcher};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_work_with_adult_view() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/123"))
        .and(query_param("view_adult", "true"))
        .and(header("cookie", "view_adult=true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>work</html>", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri(), Duration::from_secs(5), true).unwrap();
    let html = fetcher.fetch(StoryId::new(123)).await.unwrap();

    assert_eq!(html, "<html>work</html>");
}

#[tokio::test]
async fn adult_view_is_optional() {
    let mock_server = MockServer::start().await;

    let fetcher = Fetcher::new(&mock_server.uri(), Duration::from_secs(5), false).unwrap();
    let url = fetcher.work_url(StoryId::new(9)).unwrap();

    assert_eq!(url.path(), "/works/9");
    assert_eq!(url.query(), None);
}

#[tokio::test]
async fn missing_work_is_a_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri(), Duration::from_secs(5), true).unwrap();
    let err = fetcher.fetch(StoryId::new(404)).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(StatusCode::NOT_FOUND)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn rate_limiting_is_a_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri(), Duration::from_secs(5), true).unwrap();
    let err = fetcher.fetch(StoryId::new(1)).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(StatusCode::TOO_MANY_REQUESTS)));
}

#[tokio::test]
async fn slow_archive_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri(), Duration::from_millis(500), true).unwrap();
    let err = fetcher.fetch(StoryId::new(1)).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout));
}

#[test]
fn invalid_archive_url() {
    assert!(matches!(
        Fetcher::new("not a url", Duration::from_secs(1), true),
        Err(FetchError::Url(_))
    ));
    assert!(matches!(
        Fetcher::new("archiveofourown.org", Duration::from_secs(1), true),
        Err(FetchError::Url(_))
    ));
}
