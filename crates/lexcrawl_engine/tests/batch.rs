use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lexcrawl_core::{CrawlOutcome, FailureStage, OutcomeStatus};
use lexcrawl_engine::{BatchOrchestrator, DocumentPipeline, EngineConfig, SingleDocumentPipeline};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Succeeds for every URL and records when each one started.
#[derive(Default)]
struct RecordingPipeline {
    calls: Mutex<Vec<(String, Instant)>>,
    cancel_on: Option<(String, CancellationToken)>,
}

#[async_trait]
impl DocumentPipeline for RecordingPipeline {
    async fn process(&self, url: &str, output_dir: &Path) -> CrawlOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == url {
                token.cancel();
            }
        }
        CrawlOutcome::success(url, output_dir.join(format!("{}.md", url.len())))
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn delay_applies_only_between_items() {
    let delay = Duration::from_secs(3);
    let orchestrator = BatchOrchestrator::new(RecordingPipeline::default(), delay);
    let started = Instant::now();

    let report = orchestrator
        .run(&urls(&["u1", "u2", "u3"]), Path::new("out"))
        .await;

    let elapsed = started.elapsed();
    assert!(elapsed >= delay * 2, "{elapsed:?}");
    assert!(elapsed < delay * 3, "{elapsed:?}");

    let calls = orchestrator.pipeline().calls.lock().unwrap().clone();
    let order: Vec<_> = calls.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(order, vec!["u1", "u2", "u3"]);
    assert!(calls[1].1 - calls[0].1 >= delay);
    assert!(calls[2].1 - calls[1].1 >= delay);

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 3);
}

#[tokio::test(start_paused = true)]
async fn duplicates_are_processed_in_order() {
    let orchestrator = BatchOrchestrator::new(RecordingPipeline::default(), Duration::from_secs(1));
    let input = urls(&["a", "b", "a"]);

    let report = orchestrator.run(&input, Path::new("out")).await;

    let reported: Vec<_> = report.outcomes.iter().map(|o| o.url.clone()).collect();
    assert_eq!(reported, input);
}

#[tokio::test]
async fn empty_batch_reports_nothing() {
    let orchestrator = BatchOrchestrator::new(RecordingPipeline::default(), Duration::from_secs(60));
    let report = orchestrator.run(&[], Path::new("out")).await;
    assert_eq!(report.total, 0);
    assert!(report.outcomes.is_empty());
    assert!(orchestrator.pipeline().calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_skips_remaining_items() {
    let token = CancellationToken::new();
    let pipeline = RecordingPipeline {
        cancel_on: Some(("u2".to_string(), token.clone())),
        ..RecordingPipeline::default()
    };
    let orchestrator = BatchOrchestrator::new(pipeline, Duration::from_secs(5));

    let report = orchestrator
        .run_until_cancelled(&urls(&["u1", "u2", "u3", "u4"]), Path::new("out"), &token)
        .await;

    assert_eq!(report.total, 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.outcomes[2].status, OutcomeStatus::Skipped);
    assert_eq!(report.outcomes[3].status, OutcomeStatus::Skipped);
    assert_eq!(orchestrator.pipeline().calls.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_the_wait_stops_the_batch() {
    let token = CancellationToken::new();
    let orchestrator = BatchOrchestrator::new(RecordingPipeline::default(), Duration::from_secs(600));
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let report = orchestrator
        .run_until_cancelled(&urls(&["u1", "u2"]), Path::new("out"), &token)
        .await;

    assert!(started.elapsed() < Duration::from_secs(600));
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn token_cancelled_up_front_processes_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let orchestrator = BatchOrchestrator::new(RecordingPipeline::default(), Duration::ZERO);

    let report = orchestrator
        .run_until_cancelled(&urls(&["u1", "u2"]), Path::new("out"), &token)
        .await;

    assert_eq!(report.skipped, 2);
    assert!(orchestrator.pipeline().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failing_item_does_not_stop_the_batch() {
    let server = MockServer::start().await;
    for (route, body) in [
        ("/a", "<html><body><article><h1>A</h1><p>First act text.</p></article></body></html>"),
        ("/b", "<html><body><nav>Menu</nav></body></html>"),
        ("/c", "<html><body><article><h1>C</h1><p>Third act text.</p></article></body></html>"),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(&server)
            .await;
    }
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default_with_output(dir.path().to_path_buf());
    let pipeline = SingleDocumentPipeline::from_config(&config).unwrap();
    let orchestrator = BatchOrchestrator::new(pipeline, Duration::from_millis(10));
    let input: Vec<String> = ["/a", "/b", "/c"]
        .iter()
        .map(|route| format!("{}{route}", server.uri()))
        .collect();

    let report = orchestrator.run(&input, dir.path()).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert!(report.outcomes[0].is_success());
    assert!(matches!(
        report.outcomes[1].status,
        OutcomeStatus::Failure {
            stage: FailureStage::Extraction,
            ..
        }
    ));
    assert!(report.outcomes[2].is_success());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn malformed_url_in_the_middle_is_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><main><p>Notice of appointment.</p></main></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default_with_output(dir.path().to_path_buf());
    let orchestrator = BatchOrchestrator::new(
        SingleDocumentPipeline::from_config(&config).unwrap(),
        Duration::ZERO,
    );
    let input = vec![
        format!("{}/one", server.uri()),
        "not a url".to_string(),
        format!("{}/two", server.uri()),
    ];

    let report = orchestrator.run(&input, dir.path()).await;

    let statuses: Vec<bool> = report.outcomes.iter().map(CrawlOutcome::is_success).collect();
    assert_eq!(statuses, vec![true, false, true]);
    assert!(matches!(
        report.outcomes[1].status,
        OutcomeStatus::Failure {
            stage: FailureStage::Network,
            ..
        }
    ));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);
}
