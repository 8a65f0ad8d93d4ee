use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::TransportError;

// ---------------------------------------------------------------------------
// Text-fetch collaborator
// ---------------------------------------------------------------------------

/// Raw response for one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct TextResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl TextResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can hand back the raw text of a named resource.
///
/// A returned `Err` means the transport failed; a non-2xx status is reported
/// through [`TextResponse::status`].
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn get(&self, resource: &str) -> Result<TextResponse, TransportError>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl TextSource for HttpSource {
    async fn get(&self, resource: &str) -> Result<TextResponse, TransportError> {
        let url = self.base_url.join(resource)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(TextResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// Reads resources as files below a directory. A missing file is reported as
/// `404 Not Found` so it is handled like its HTTP counterpart.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TextSource for DirectorySource {
    async fn get(&self, resource: &str) -> Result<TextResponse, TransportError> {
        match tokio::fs::read_to_string(self.root.join(resource)).await {
            Ok(body) => Ok(TextResponse::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TextResponse {
                status: 404,
                reason: "Not Found".to_string(),
                body: String::new(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(response: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        let base = Url::parse(&format!("http://{addr}/data/")).unwrap();
        (base, handle)
    }

    fn direct(base: Url) -> HttpSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSource::with_client(client, base)
    }

    #[tokio::test]
    async fn http_source_joins_resource_onto_base_url() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\nA,B\n1,2\n",
        )
        .await;

        let response = direct(base).get("m.csv").await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.reason, "OK");
        assert_eq!(response.body, "A,B\n1,2\n");
        assert_eq!(server.await.unwrap(), "GET /data/m.csv HTTP/1.1");
    }

    #[tokio::test]
    async fn http_source_reports_non_success_status_with_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 7\r\nConnection: close\r\n\r\nmissing",
        )
        .await;

        let response = direct(base).get("absent.csv").await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.reason, "Not Found");
        assert_eq!(response.body, "missing");
        assert!(!response.is_success());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn http_source_transport_failure_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}/")).unwrap();
        assert!(direct(base).get("m.csv").await.is_err());
    }

    #[tokio::test]
    async fn missing_file_reads_as_not_found() {
        let source = DirectorySource::new(std::env::temp_dir().join("quantum-dash-nowhere"));
        let response = source.get("absent.csv").await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn existing_file_reads_as_ok() {
        let dir = std::env::temp_dir().join(format!("quantum-dash-src-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("t.csv"), "A,B\n1,2\n").unwrap();

        let response = DirectorySource::new(&dir).get("t.csv").await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "A,B\n1,2\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
