//! Batch analysis against mocked scoring and page servers

use crate::{create_orchestrator, create_test_config, scoring_body};
use pagescope::analysis::{AnalysisError, AnalysisMode, Orchestrator};
use pagescope::scoring::{DeviceProfile, MetricValue, PERFORMANCE_SCORE};
use pagescope::TaskError;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn both_profiles() -> AnalysisMode {
    AnalysisMode::Scoring(vec![DeviceProfile::Desktop, DeviceProfile::Mobile])
}

#[tokio::test]
async fn test_invalid_input_rejects_batch_without_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.9)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let err = orchestrator
        .analyze(&["https://a.example", "not-a-url"], &both_profiles())
        .await
        .unwrap_err();

    match err {
        AnalysisError::Validation(e) => {
            assert_eq!(e.invalid, vec!["not-a-url".to_string()]);
            assert!(e.to_string().contains("not-a-url"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_request_is_rejected() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let urls: Vec<String> = vec![];
    let err = orchestrator.analyze(&urls, &both_profiles()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyRequest));
}

#[tokio::test]
async fn test_scores_every_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("key", "test-key"))
        .and(query_param("category", "performance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.87)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let batch = orchestrator
        .analyze(&["https://a.example"], &both_profiles())
        .await
        .expect("analysis failed");

    assert_eq!(batch.len(), 1);
    assert!(batch.diagnostics.is_empty());

    let result = &batch.results[0];
    assert_eq!(result.url, "https://a.example");
    for profile in DeviceProfile::ALL {
        let bundle = result.scores(profile).expect("missing profile");
        assert_eq!(bundle.get(PERFORMANCE_SCORE), Some(&MetricValue::Count(87)));
    }
}

#[tokio::test]
async fn test_malformed_response_drops_only_that_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://a.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://b.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let batch = orchestrator
        .analyze(&["https://a.example", "https://b.example"], &both_profiles())
        .await
        .expect("analysis failed");

    assert_eq!(batch.urls(), vec!["https://a.example"]);
    assert_eq!(batch.failed_urls(), vec!["https://b.example"]);
    assert_eq!(batch.diagnostics.len(), 2);
    assert!(batch
        .diagnostics
        .iter()
        .all(|d| matches!(d.error, TaskError::Protocol(_))));
}

#[tokio::test]
async fn test_one_failed_profile_drops_the_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("strategy", "desktop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.7)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("strategy", "mobile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let err = orchestrator
        .analyze(&["https://a.example"], &both_profiles())
        .await
        .unwrap_err();

    match err {
        AnalysisError::NoResults { diagnostics } => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].profile, Some(DeviceProfile::Mobile));
            assert!(matches!(diagnostics[0].error, TaskError::Transport(_)));
        }
        other => panic!("expected no results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://slow.example/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(scoring_body(0.9))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://fast.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.9)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let orchestrator = create_orchestrator(&config);

    let batch = orchestrator
        .analyze(
            &["https://slow.example", "https://fast.example"],
            &AnalysisMode::Scoring(vec![DeviceProfile::Mobile]),
        )
        .await
        .expect("analysis failed");

    assert_eq!(batch.urls(), vec!["https://fast.example"]);
    assert_eq!(batch.diagnostics.len(), 1);
    assert_eq!(batch.diagnostics[0].url, "https://slow.example");
    assert!(matches!(
        batch.diagnostics[0].error,
        TaskError::Transport(_)
    ));
}

#[tokio::test]
async fn test_rejected_key_is_configuration_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key."}}"#,
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let err = orchestrator
        .analyze(&["https://a.example"], &both_profiles())
        .await
        .unwrap_err();

    match err {
        AnalysisError::NoResults { diagnostics } => {
            assert_eq!(diagnostics.len(), 2);
            assert!(diagnostics
                .iter()
                .all(|d| matches!(d.error, TaskError::Configuration(_))));
        }
        other => panic!("expected no results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_key_sends_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.9)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = Orchestrator::from_config(&config, None).unwrap();

    let err = orchestrator
        .analyze(&["https://a.example", "https://b.example"], &both_profiles())
        .await
        .unwrap_err();

    match err {
        AnalysisError::NoResults { diagnostics } => {
            assert_eq!(diagnostics.len(), 4);
            assert!(diagnostics
                .iter()
                .all(|d| matches!(d.error, TaskError::Configuration(_))));
        }
        other => panic!("expected no results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_results_keep_input_order() {
    let mock_server = MockServer::start().await;

    // Earlier inputs answer slower so completion order is reversed
    for (i, host) in ["one", "two", "three", "four"].iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/runPagespeed"))
            .and(query_param("url", format!("https://{}.example/", host).as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(scoring_body(0.6))
                    .set_delay(Duration::from_millis(200 - 50 * i as u64)),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://broken.example/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = create_orchestrator(&config);

    let inputs = [
        "https://one.example",
        "https://broken.example",
        "https://two.example",
        "https://three.example",
        "https://four.example",
    ];
    let batch = orchestrator
        .analyze(&inputs, &both_profiles())
        .await
        .expect("analysis failed");

    assert_eq!(
        batch.urls(),
        vec![
            "https://one.example",
            "https://two.example",
            "https://three.example",
            "https://four.example",
        ]
    );
    assert_eq!(batch.failed_urls(), vec!["https://broken.example"]);
}

#[tokio::test]
async fn test_structural_path_extracts_metrics() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head>
            <title>Test Page</title>
            <meta name="description" content="A page for testing">
            <meta name="viewport" content="width=device-width">
            <link rel="stylesheet" href="/a.css">
            <script src="/app.js"></script>
            </head><body>
            <h1>Hello</h1><h2>World</h2>
            <img src="/a.png"><img src="/b.png">
            <a href="/one">One</a><a href="/two">Two</a><a href="/three">Three</a>
            </body></html>"#,
            "text/html; charset=utf-8",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = Orchestrator::from_config(&config, None).unwrap();

    let page_url = format!("{}/page", mock_server.uri());
    let batch = orchestrator
        .analyze(&[page_url.as_str()], &AnalysisMode::Structure)
        .await
        .expect("analysis failed");

    assert_eq!(batch.len(), 1);
    assert!(batch.diagnostics.is_empty());
    assert_eq!(batch.results[0].url, page_url);

    let metrics = batch.results[0].structure().expect("missing metrics");
    assert_eq!(metrics.title, "Test Page");
    assert_eq!(metrics.meta_description, "A page for testing");
    assert_eq!(metrics.header_count, 2);
    assert_eq!(metrics.h1_count, 1);
    assert_eq!(metrics.image_count, 2);
    assert_eq!(metrics.link_count, 3);
    assert_eq!(metrics.script_count, 1);
    assert_eq!(metrics.stylesheet_count, 1);
    assert!(metrics.has_meta_description);
    assert!(metrics.has_viewport_meta);
}

#[tokio::test]
async fn test_structural_path_non_2xx_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>OK</title></head></html>",
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = Orchestrator::from_config(&config, None).unwrap();

    let base = mock_server.uri();
    let inputs = vec![
        format!("{}/missing", base),
        format!("{}/ok", base),
        format!("{}/broken", base),
    ];
    let batch = orchestrator
        .analyze(&inputs, &AnalysisMode::Structure)
        .await
        .expect("analysis failed");

    assert_eq!(batch.urls(), vec![inputs[1].as_str()]);
    assert_eq!(batch.results[0].structure().unwrap().title, "OK");
    assert_eq!(batch.diagnostics.len(), 2);
    assert!(matches!(
        batch.diagnostics[0].error,
        TaskError::Transport(ref m) if m.contains("404")
    ));
    assert!(matches!(
        batch.diagnostics[1].error,
        TaskError::Transport(ref m) if m.contains("500")
    ));
}

#[tokio::test]
async fn test_structural_path_parses_any_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<title>Served as text</title><a href=\"/x\">x</a>",
            "text/plain",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let orchestrator = Orchestrator::from_config(&config, None).unwrap();

    let base = mock_server.uri();
    let inputs = vec![format!("{}/plain", base), format!("{}/data.json", base)];
    let batch = orchestrator
        .analyze(&inputs, &AnalysisMode::Structure)
        .await
        .expect("analysis failed");

    assert_eq!(batch.len(), 2);
    assert!(batch.diagnostics.is_empty());

    let plain = batch.results[0].structure().unwrap();
    assert_eq!(plain.title, "Served as text");
    assert_eq!(plain.link_count, 1);

    let json = batch.results[1].structure().unwrap();
    assert_eq!(json.title, "");
    assert_eq!(json.link_count, 0);
    assert!(!json.has_viewport_meta);
}

#[tokio::test]
async fn test_concurrency_cap_of_one_still_completes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.42)))
        .expect(6)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 5);
    config.analysis.max_concurrent_tasks = 1;
    let orchestrator = create_orchestrator(&config);

    let batch = orchestrator
        .analyze(
            &["https://a.example", "https://b.example", "https://c.example"],
            &both_profiles(),
        )
        .await
        .expect("analysis failed");

    assert_eq!(batch.len(), 3);
}

#[tokio::test]
async fn test_dropping_analysis_cancels_in_flight_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(scoring_body(0.8))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 30);
    let orchestrator = create_orchestrator(&config);

    let started = std::time::Instant::now();
    let outcome = tokio::time::timeout(
        Duration::from_millis(500),
        orchestrator.analyze(&["https://a.example", "https://b.example"], &both_profiles()),
    )
    .await;

    // The batch future was dropped: no result of any kind came back
    assert!(outcome.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));

    // The requests had been sent when the batch was dropped
    let received = mock_server.received_requests().await.unwrap();
    assert!(!received.is_empty());
    assert!(received.len() <= 4);
}

#[tokio::test]
async fn test_orchestrator_reusable_after_cancelled_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://slow.example/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(scoring_body(0.8))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", "https://fast.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(scoring_body(0.8)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 30);
    config.analysis.max_concurrent_tasks = 1;
    let orchestrator = create_orchestrator(&config);
    let mode = AnalysisMode::Scoring(vec![DeviceProfile::Desktop]);

    let cancelled = tokio::time::timeout(
        Duration::from_millis(300),
        orchestrator.analyze(&["https://slow.example"], &mode),
    )
    .await;
    assert!(cancelled.is_err());

    // The permit held by the dropped task does not leak into the next batch
    let batch = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.analyze(&["https://fast.example"], &mode),
    )
    .await
    .expect("second batch hung")
    .expect("analysis failed");

    assert_eq!(batch.urls(), vec!["https://fast.example"]);
}
