//! Network submission: admit-at-completion semantics.

mod common;

use common::test_engine;
use danmaku_overlay::submission::{
    ChannelTransport, SubmissionResponse, SubmissionTransport, submit_via,
};
use danmaku_overlay::{Error, Origin};

fn ok_response(id: &str, text: &str) -> SubmissionResponse {
    SubmissionResponse {
        success: true,
        danmaku_id: Some(id.to_string()),
        danmaku_text: Some(text.to_string()),
        error: None,
    }
}

#[tokio::test]
async fn confirmed_item_is_admitted_and_spawned() {
    let (engine, surface, _clock) = test_engine();
    let (transport, mut rx) = ChannelTransport::new();

    let submit = submit_via(&transport, &engine, "nice touch", "viewer-1", Origin::User);
    let service = async {
        let (request, reply) = rx.recv().await.expect("request reaches the backend");
        assert_eq!(request.message, "nice touch");
        assert_eq!(request.user_id, "viewer-1");
        reply
            .send(Ok(ok_response("user_1700000000001", &request.message)))
            .unwrap();
    };

    let (result, ()) = tokio::join!(submit, service);
    assert_eq!(result.unwrap(), "user_1700000000001");
    assert_eq!(engine.stats().queued, 1);
    assert_eq!(engine.stats().active, 1);
    assert_eq!(surface.label_count(), 1);
}

#[tokio::test]
async fn late_completion_fills_backlog_but_not_surface() {
    let (engine, surface, _clock) = test_engine();
    let (transport, mut rx) = ChannelTransport::new();

    let submit = submit_via(&transport, &engine, "slow boat", "viewer-1", Origin::User);
    let service = async {
        let (request, reply) = rx.recv().await.unwrap();
        // Overlay turned off while the request was in flight.
        engine.set_enabled(false);
        reply.send(Ok(ok_response("user_2", &request.message))).unwrap();
    };

    let (result, ()) = tokio::join!(submit, service);
    assert!(result.is_ok());
    assert_eq!(engine.stats().queued, 1, "history is preserved");
    assert_eq!(engine.stats().active, 0, "no spawn while disabled");
    assert_eq!(surface.label_count(), 0);
}

#[tokio::test]
async fn backend_failure_is_terminal_and_admits_nothing() {
    let (engine, _surface, _clock) = test_engine();
    let (transport, mut rx) = ChannelTransport::new();

    let submit = submit_via(&transport, &engine, "doomed", "viewer-1", Origin::User);
    let service = async {
        let (_request, reply) = rx.recv().await.unwrap();
        reply
            .send(Ok(SubmissionResponse {
                success: false,
                danmaku_id: None,
                danmaku_text: None,
                error: Some("rate limited".to_string()),
            }))
            .unwrap();
    };

    let (result, ()) = tokio::join!(submit, service);
    match result {
        Err(Error::Submission(reason)) => assert!(reason.contains("rate limited")),
        other => panic!("expected Submission error, got {other:?}"),
    }
    assert_eq!(engine.stats().total, 0);
}

#[tokio::test]
async fn dropped_backend_reports_a_submission_error() {
    let (engine, _surface, _clock) = test_engine();
    let (transport, rx) = ChannelTransport::new();
    drop(rx);

    let result = submit_via(&transport, &engine, "anyone there", "viewer-1", Origin::User).await;
    assert!(matches!(result, Err(Error::Submission(_))));
    assert_eq!(engine.stats().total, 0);
}

#[tokio::test]
async fn validation_runs_before_the_wire() {
    let (engine, _surface, _clock) = test_engine();
    let (transport, mut rx) = ChannelTransport::new();

    let result = submit_via(&transport, &engine, "  ", "viewer-1", Origin::User).await;
    assert!(matches!(result, Err(Error::EmptyText)));
    // Nothing was sent.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn wire_types_match_the_backend_contract() {
    let request = danmaku_overlay::submission::SubmissionRequest {
        message: "hello".to_string(),
        user_id: "u1".to_string(),
        kind: Origin::User,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["type"], "user");
    assert_eq!(json["message"], "hello");

    let body = r#"{"success": true, "danmaku_id": "user_9", "danmaku_text": "hello"}"#;
    let response: SubmissionResponse = serde_json::from_str(body).unwrap();
    assert!(response.success);
    assert_eq!(response.danmaku_id.as_deref(), Some("user_9"));
    assert_eq!(response.error, None);

    // Transport doubles can be exercised without an engine.
    let (transport, mut rx) = ChannelTransport::new();
    let send = transport.send(request);
    let service = async {
        let (request, reply) = rx.recv().await.unwrap();
        reply.send(Ok(ok_response("user_9", &request.message))).unwrap();
    };
    let (sent, ()) = tokio::join!(send, service);
    assert!(sent.unwrap().success);
}
