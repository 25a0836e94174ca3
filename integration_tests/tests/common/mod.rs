#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use anyhow::Context;
use gym_proto::{decode_response_json, GymsResponse};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const CONFIG_PATH_ENV: &str = "GYM_WATCH_CONFIG_PATH";

static INIT: Once = Once::new();

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Point `GYM_WATCH_CONFIG_PATH` at the env fixture, once per test binary.
pub fn ensure_env_config() -> PathBuf {
    let config_path = fixture_path("env_watch_config.json");
    INIT.call_once(|| {
        debug_assert!(
            config_path.exists(),
            "missing config fixture {}",
            config_path.display()
        );
        std::env::set_var(CONFIG_PATH_ENV, &config_path);
    });
    config_path
}

pub fn fixture_text(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("missing fixture {}: {}", path.display(), err))
}

pub fn fixture(name: &str) -> GymsResponse {
    decode_response_json(&fixture_text(name)).expect("fixture decodes")
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the answer back for `delay` after the request arrives.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Minimal HTTP/1.1 server answering every request from a queue.
///
/// The last queued response is repeated once the queue is down to one entry.
/// Each connection is served on its own task so overlapping requests show up
/// in [`StubServer::max_in_flight`].
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    max_in_flight: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let queue = Arc::new(Mutex::new(VecDeque::from(responses)));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&requests);
        let peak = Arc::clone(&max_in_flight);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let seen = Arc::clone(&seen);
                let peak = Arc::clone(&peak);
                let queue = Arc::clone(&queue);
                let in_flight = Arc::clone(&in_flight);
                tokio::spawn(async move {
                    let Ok(path) = read_request_path(&mut stream).await else {
                        return;
                    };
                    seen.lock().expect("stub requests mutex poisoned").push(path);
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(current, Ordering::SeqCst);

                    let response = {
                        let mut queue = queue.lock().expect("stub queue mutex poisoned");
                        if queue.len() > 1 {
                            queue.pop_front()
                        } else {
                            queue.front().cloned()
                        }
                    };
                    if let Some(response) = &response {
                        tokio::time::sleep(response.delay).await;
                    }
                    // Released before the answer goes out.
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    if let Some(response) = response {
                        let _ = write_response(&mut stream, &response).await;
                    }
                });
            }
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            requests,
            max_in_flight,
        })
    }

    /// Request targets seen so far, e.g. `/gyms?after=10`.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("stub requests mutex poisoned")
            .clone()
    }

    /// Highest number of requests that were being answered at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

async fn read_request_path(stream: &mut TcpStream) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buffer.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let head = String::from_utf8_lossy(&buffer);
    let request_line = head.lines().next().context("empty request")?;
    let target = request_line
        .split_whitespace()
        .nth(1)
        .context("request line without target")?;
    Ok(target.to_string())
}

async fn write_response(stream: &mut TcpStream, response: &StubResponse) -> std::io::Result<()> {
    let reason = match response.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );
    stream.write_all(payload.as_bytes()).await?;
    stream.shutdown().await
}
