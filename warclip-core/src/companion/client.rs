//! HTTP transport for companion messages
//!
//! Each message is POSTed as JSON to the configured endpoint on a background
//! runtime. `send` returns as soon as the request is spawned.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::config::CompanionConfig;
use crate::error::{Error, Result};

use super::{ChannelMessage, CompanionChannel};

/// Companion reachable over HTTP
///
/// Owns a small tokio runtime so `send` can be called from plain threads.
/// Use it from synchronous code only: [`wait_idle`](Self::wait_idle) blocks on
/// that runtime and dropping the client shuts it down, and both panic when
/// called from inside another async runtime.
pub struct HttpCompanion {
    http_client: reqwest::Client,
    endpoint: String,
    runtime: Runtime,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpCompanion {
    /// Create a companion client from configuration
    ///
    /// Returns None if the companion is not enabled or has no endpoint.
    pub fn new(config: &CompanionConfig) -> Result<Option<Self>> {
        if !config.is_ready() {
            return Ok(None);
        }
        config.validate()?;

        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| Error::Config("companion.endpoint is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("warclip-companion")
            .enable_all()
            .build()
            .map_err(|e| Error::Companion(format!("failed to create runtime: {}", e)))?;

        Ok(Some(Self {
            http_client,
            endpoint,
            runtime,
            in_flight: Mutex::new(Vec::new()),
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Block until every message sent so far is delivered or has failed,
    /// or until `timeout` elapses.
    ///
    /// Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let handles = match self.in_flight.lock() {
            Ok(mut in_flight) => std::mem::take(&mut *in_flight),
            Err(_) => return false,
        };
        if handles.is_empty() {
            return true;
        }

        self.runtime.block_on(async {
            tokio::time::timeout(timeout, async {
                for handle in handles {
                    let _ = handle.await;
                }
            })
            .await
            .is_ok()
        })
    }
}

impl CompanionChannel for HttpCompanion {
    fn send(&self, message: ChannelMessage) -> Result<()> {
        let body = serde_json::to_vec(&message)?;
        let request = self.http_client.post(&self.endpoint).body(body);
        let channel = message.channel;

        let handle = self.runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(channel = %channel, "Companion message delivered");
                }
                Ok(response) => {
                    tracing::warn!(
                        channel = %channel,
                        status = %response.status(),
                        "Companion rejected message"
                    );
                }
                Err(e) => {
                    tracing::warn!(channel = %channel, error = %e, "Companion request failed");
                }
            }
        });

        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| Error::Companion("in-flight list lock poisoned".to_string()))?;
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKey;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;

    fn config(endpoint: &str) -> CompanionConfig {
        CompanionConfig {
            enabled: true,
            endpoint: Some(endpoint.to_string()),
            timeout_secs: 2,
        }
    }

    /// Accept one request and return its body
    fn serve_once(listener: TcpListener) -> std::thread::JoinHandle<String> {
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .unwrap();
            String::from_utf8(body).unwrap()
        })
    }

    #[test]
    fn disabled_config_yields_none() {
        let disabled = CompanionConfig::default();
        assert!(HttpCompanion::new(&disabled).unwrap().is_none());
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        assert!(HttpCompanion::new(&config("ftp://127.0.0.1/ipc")).is_err());
    }

    #[test]
    fn posts_message_as_json() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_once(listener);

        let companion = HttpCompanion::new(&config(&format!("http://{}/ipc", addr)))
            .unwrap()
            .unwrap();
        companion
            .send(ChannelMessage::tag(&SessionKey::local("/v/raid.mp4"), "wipe on p3"))
            .unwrap();
        assert!(companion.wait_idle(Duration::from_secs(5)));

        let body: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(body["channel"], "videoButton");
        assert_eq!(
            body["payload"],
            serde_json::json!(["tag", "/v/raid.mp4", false, "wipe on p3"])
        );
    }

    #[test]
    fn unreachable_endpoint_does_not_fail_send() {
        // Bind then drop to get a port with nothing listening.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let companion = HttpCompanion::new(&config(&format!("http://{}/ipc", addr)))
            .unwrap()
            .unwrap();

        let result = companion.send(ChannelMessage::tag(&SessionKey::cloud("a.mp4"), "x"));
        assert!(result.is_ok());
        assert!(companion.wait_idle(Duration::from_secs(5)));
    }

    #[test]
    fn shared_across_plain_threads_and_dropped_outside_runtime() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_once(listener);

        let companion = std::sync::Arc::new(
            HttpCompanion::new(&config(&format!("http://{}/ipc", addr)))
                .unwrap()
                .unwrap(),
        );

        let worker = {
            let companion = companion.clone();
            std::thread::spawn(move || {
                companion
                    .send(ChannelMessage::tag(&SessionKey::local("/v/key.mp4"), "late"))
                    .unwrap();
                companion.wait_idle(Duration::from_secs(5))
            })
        };

        assert!(worker.join().unwrap());
        assert!(server.join().unwrap().contains("late"));
        drop(companion);
    }
}
