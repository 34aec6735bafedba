use std::time::Duration;

use harvester_engine::{
    ClassificationTarget, EngineConfig, EngineHandle, PageRequest, RunEvent, RunHandle, RunPhase,
    RunResult,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Drain events on a blocking thread so the mock server keeps serving.
async fn drain(run: RunHandle) -> (Vec<RunEvent>, RunHandle) {
    tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        while let Some(event) = run.recv_timeout(Duration::from_secs(10)) {
            let done = matches!(event, RunEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        (events, run)
    })
    .await
    .unwrap()
}

fn finished(events: &[RunEvent]) -> Vec<&RunResult> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Finished(result) => Some(result),
            _ => None,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn run_reports_progress_and_final_count_over_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<img src="/a.png"><img src="/b.webp">"#.to_string(),
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"A".to_vec(), "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.webp"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"B".to_vec(), "image/webp"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineConfig::default());
    let run = engine.start(
        PageRequest::new(format!("{}/page", server.uri())),
        ClassificationTarget::new("Higo", dir.path().join("Higo")),
    );

    let (events, run) = drain(run).await;
    let progress: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Progress(pct) => Some(*pct),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![50, 100]);

    let results = finished(&events);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].saved_count, 2);
    assert_eq!(results[0].phase, RunPhase::Completed);

    let joined = tokio::task::spawn_blocking(move || run.join().unwrap())
        .await
        .unwrap();
    assert_eq!(&joined, results[0]);
    assert_eq!(std::fs::read_dir(dir.path().join("Higo")).unwrap().count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_after_finish_has_no_effect() {
    let dir = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineConfig::default());
    let run = engine.start(
        PageRequest::new(""),
        ClassificationTarget::new("Nuez", dir.path().join("Nuez")),
    );

    let (events, run) = drain(run).await;
    assert_eq!(finished(&events)[0].saved_count, 0);

    let run = tokio::task::spawn_blocking(move || {
        while !run.is_finished() {
            std::thread::sleep(Duration::from_millis(5));
        }
        run
    })
    .await
    .unwrap();
    assert!(!run.cancel());
    assert_eq!(run.join().unwrap().phase, RunPhase::Completed);
}
