// One shared server per test binary, plus small websocket helpers.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Start the server on first use and return its base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread and runtime, so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                void_skies_server::run(listener).await.expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect() -> Client {
    let base_url = ensure_server();
    let ws_url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (client, _response) = connect_async(ws_url).await.expect("websocket handshake");
    client
}

pub async fn emit(client: &mut Client, event: &str, data: Value, ack: Option<u64>) {
    let mut frame = json!({ "event": event, "data": data });
    if let Some(id) = ack {
        frame["ack"] = json!(id);
    }
    client
        .send(Message::text(frame.to_string()))
        .await
        .expect("send frame");
}

// Next text frame as JSON; fails the test on timeout or close.
pub async fn next_frame(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection ended")
            .expect("websocket error");
        if let Message::Text(_) = msg {
            let text = msg.to_text().expect("text frame");
            return serde_json::from_str(text).expect("server frames are JSON");
        }
    }
}

// Skips frames until one with the given event name arrives; returns its data.
pub async fn expect_event(client: &mut Client, event: &str) -> Value {
    loop {
        let frame = next_frame(client).await;
        if frame["event"] == event {
            return frame["data"].clone();
        }
    }
}

// Sends an event with an ack id and waits for the matching ack result.
pub async fn request(client: &mut Client, event: &str, data: Value, ack: u64) -> Value {
    emit(client, event, data, Some(ack)).await;
    loop {
        let reply = expect_event(client, "ack").await;
        if reply["id"] == ack {
            return reply["result"].clone();
        }
    }
}
