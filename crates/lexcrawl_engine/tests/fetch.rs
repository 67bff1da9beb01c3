use std::time::Duration;

use lexcrawl_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_settings() -> FetchSettings {
    FetchSettings {
        request_timeout: Duration::from_millis(200),
        retry_backoff: Duration::from_millis(10),
        ..FetchSettings::default()
    }
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn fetcher_returns_html_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings()).unwrap();
    let url = format!("{}/doc", server.uri());

    let output = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, url);
    assert_eq!(output.metadata.status, 200);
    assert_eq!(output.metadata.attempts, 1);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn fetcher_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "lexcrawl-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>ua</p>", "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        user_agent: "lexcrawl-test/1.0".to_string(),
        ..quick_settings()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let output = fetcher.fetch(&format!("{}/ua", server.uri())).await;
    assert!(output.is_ok(), "{output:?}");
}

#[tokio::test]
async fn client_errors_are_final() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings()).unwrap();
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.attempts, 1);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn timeouts_exhaust_the_retry_budget_before_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        retries: 2,
        ..quick_settings()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(err.attempts, 3);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>back</p>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings()).unwrap();
    let output = fetcher
        .fetch(&format!("{}/flaky", server.uri()))
        .await
        .expect("third attempt succeeds");
    assert_eq!(output.metadata.attempts, 3);
    assert_eq!(output.bytes, b"<p>back</p>");
}

#[tokio::test]
async fn zero_retries_means_a_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        retries: 0,
        ..quick_settings()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch(&format!("{}/down", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn malformed_url_fails_without_a_request() {
    let fetcher = ReqwestFetcher::new(quick_settings()).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    assert_eq!(err.attempts, 0);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("01234567890", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..quick_settings()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn non_html_content_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/file.pdf", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/pdf".to_string()
        }
    );
}
