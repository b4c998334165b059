//! Companion client against a local WebSocket bridge.
//!
//! Run with: `cargo test --test companion_bridge`

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use indirector::companion::{ButtonLocation, Companion, CompanionSettings, Matcher, SnippetSettings};

fn settings(url: String) -> CompanionSettings {
    CompanionSettings {
        url,
        request_timeout: Duration::from_secs(1),
        surface_id: "indirector".to_string(),
        snippets: None,
    }
}

fn parse(message: Message) -> Value {
    match message {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected frame {other:?}"),
    }
}

async fn wait_until(mut ready: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !ready() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn reconnects_after_bridge_closes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        // First session: drop the client right after its snapshot request.
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let first = parse(ws.next().await.unwrap().unwrap());
        assert_eq!(first["id"], json!(1));
        let _ = ws.close(None).await;
        drop(ws);
        let closed_at = Instant::now();

        // Second session: serve a snapshot and one action.
        let (tcp, _) = listener.accept().await.unwrap();
        let reconnect_gap = closed_at.elapsed();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let snapshot = parse(ws.next().await.unwrap().unwrap());
        assert_eq!(snapshot, json!({"id": 1, "method": "queryVariables"}));
        ws.send(Message::Text(
            json!({"id": 1, "result": {"mixer": {"input_1_playing": false}}}).to_string(),
        ))
        .await
        .unwrap();

        let action = parse(ws.next().await.unwrap().unwrap());
        assert_eq!(action["method"], json!("runConnectionAction"));
        assert_eq!(action["params"]["connectionName"], json!("mixer"));
        assert_eq!(action["params"]["actionId"], json!("play"));
        assert_eq!(action["params"]["options"], json!({"input": 1}));
        assert_eq!(action["params"]["extras"]["surfaceId"], json!("indirector"));
        ws.send(Message::Text(json!({"id": action["id"], "result": true}).to_string()))
            .await
            .unwrap();

        ws.send(Message::Text(
            json!({"event": "variables_changed", "payload": {"mixer": {"input_1_playing": true}}})
                .to_string(),
        ))
        .await
        .unwrap();

        // Hold the session open until the client has seen the change.
        let _ = timeout(Duration::from_secs(5), ws.next()).await;
        reconnect_gap
    });

    let companion = Companion::new(settings(format!("ws://{}", addr)));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    companion.on_change("mixer", Matcher::prefix("input_1_"), move |change| {
        let tx = tx.clone();
        async move {
            tx.send((change.variable, change.value))?;
            Ok::<(), anyhow::Error>(())
        }
    });

    let runner = companion.clone();
    let client = tokio::spawn(async move { runner.run().await });

    let observer = companion.clone();
    wait_until(move || observer.var("mixer", "input_1_playing").is_some()).await;

    let reply = companion.action("mixer", "play", json!({"input": 1})).await.unwrap();
    assert_eq!(reply, json!(true));

    let (variable, value) = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(variable, "input_1_playing");
    assert_eq!(value, json!(true));

    client.abort();
    let gap = server.await.unwrap();
    assert!(gap >= Duration::from_millis(900), "reconnected after {:?}", gap);
}

#[tokio::test]
async fn button_interactions_reach_handlers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let _snapshot = ws.next().await.unwrap().unwrap();
        ws.send(Message::Text(json!({"id": 1, "result": {}}).to_string()))
            .await
            .unwrap();
        ws.send(Message::Text(
            json!({
                "event": "interaction",
                "payload": {"event": "press", "page": 2, "x": 3, "y": 1, "value": true}
            })
            .to_string(),
        ))
        .await
        .unwrap();
        let _ = timeout(Duration::from_secs(5), ws.next()).await;
    });

    let companion = Companion::new(settings(format!("ws://{}", addr)));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    companion.on_button_down(ButtonLocation::new(2, 3, 1), move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.location)?;
            Ok::<(), anyhow::Error>(())
        }
    });

    let runner = companion.clone();
    let client = tokio::spawn(async move { runner.run_connection().await });

    let location = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(location, ButtonLocation::new(2, 3, 1));

    client.abort();
    server.abort();
}

#[tokio::test]
async fn snippets_are_written_after_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".vscode").join("companion.code-snippets");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let _snapshot = ws.next().await.unwrap().unwrap();
        ws.send(Message::Text(
            json!({"id": 1, "result": {"mixer": {"input_1_playing": false}}}).to_string(),
        ))
        .await
        .unwrap();
        while let Some(Ok(message)) = ws.next().await {
            let request = parse(message);
            if request["method"] == json!("queryActions") {
                ws.send(Message::Text(
                    json!({"id": request["id"], "result": {"mixer": {"play": {
                        "description": "Play input",
                        "options": [{"id": "input", "type": "number", "default": 1}]
                    }}}})
                    .to_string(),
                ))
                .await
                .unwrap();
            }
        }
    });

    let mut settings = settings(format!("ws://{}", addr));
    settings.snippets = Some(SnippetSettings {
        path: path.clone(),
        delay: Duration::from_millis(50),
    });
    let companion = Companion::new(settings);
    let runner = companion.clone();
    let client = tokio::spawn(async move { runner.run_connection().await });

    let target = path.clone();
    wait_until(move || {
        std::fs::read_to_string(&target)
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .is_some_and(|snippets| snippets.get("mixer.play").is_some())
    })
    .await;

    let snippets: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(snippets.get("companion_on_change_mixer").is_some());

    client.abort();
    server.abort();
}
