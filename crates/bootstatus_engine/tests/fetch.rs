use bootstatus_engine::{FailureKind, FetchSettings, ReqwestStatusFetcher, StatusFetcher};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn status_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/msg.html", server.uri())).unwrap()
}

#[tokio::test]
async fn fetcher_returns_body_and_disables_caching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msg.html"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Booting DSM instance"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(FetchSettings::default());
    let response = fetcher.fetch(&status_url(&server)).await.expect("fetch ok");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "Booting DSM instance");
}

#[tokio::test]
async fn non_success_status_is_a_response_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msg.html"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(FetchSettings::default());
    let response = fetcher.fetch(&status_url(&server)).await.expect("fetch ok");

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "<html>gone</html>");
}

#[tokio::test]
async fn empty_body_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msg.html"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(FetchSettings::default());
    let response = fetcher.fetch(&status_url(&server)).await.expect("fetch ok");

    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = ReqwestStatusFetcher::new(FetchSettings::default());
    let url = Url::parse(&format!("http://{addr}/msg.html")).unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Connect);
}

#[tokio::test]
async fn non_http_scheme_is_rejected() {
    let fetcher = ReqwestStatusFetcher::new(FetchSettings::default());
    let url = Url::parse("ws://127.0.0.1/msg.html").unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
