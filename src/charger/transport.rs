use crate::error::Result;
use std::time::Duration;

/// Raw outcome of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self::new(200, body)
    }
}

/// Minimal GET-only HTTP transport.
///
/// Implementations report transport failures already classified as
/// `ConnectionRefused`, `Timeout`, `Network` or `Unexpected`.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Whether the transport bounds connect and each read on its own.
    ///
    /// When false, the client bounds the whole exchange instead.
    fn enforces_timeouts(&self) -> bool {
        false
    }
}

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with independent connect and read timeouts.
    ///
    /// The read timeout restarts after every successful read, so a slow
    /// device that keeps sending is not cut off. The charger lives on the
    /// LAN, so system proxy settings are ignored.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }

    fn enforces_timeouts(&self) -> bool {
        true
    }
}
