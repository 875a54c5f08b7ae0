#![allow(dead_code)]

use amq_jolokia::app::App;
use amq_jolokia::errors::BridgeError;
use amq_jolokia::jolokia::{Credentials, JolokiaTransport, RawResponse};
use amq_jolokia::services::config::BrokerConfig;
use amq_jolokia::services::logger::Logger;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub static ENV_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Answers by the first route whose fragment occurs in the URL and counts
/// every call that reaches the network boundary.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Result<RawResponse, BridgeError>)>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Credentials)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, fragment: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            fragment.to_string(),
            Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub fn fail(mut self, fragment: &str, error: BridgeError) -> Self {
        self.routes.push((fragment.to_string(), Err(error)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn credentials(&self) -> Vec<Credentials> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, creds)| creds.clone())
            .collect()
    }
}

#[async_trait]
impl JolokiaTransport for MockTransport {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<RawResponse, BridgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), credentials.clone()));
        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Err(BridgeError::transport(format!("no route for {}", url))))
    }
}

pub const VERSION_OK: &str = r#"{"request":{"mbean":"org.apache.activemq.artemis:broker=\"amq-broker-primary\"","attribute":"Version","type":"read"},"value":"2.31.0","timestamp":1700000000,"status":200}"#;

pub fn app_with(transport: Arc<MockTransport>) -> App {
    App::with_transport(Logger::new("test"), BrokerConfig::default(), transport)
        .expect("app must initialize")
}

/// Serves a single canned HTTP response and hands back the raw request text.
pub async fn fake_broker(
    status: u16,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });
    (format!("http://{}/console/jolokia", addr), handle)
}
