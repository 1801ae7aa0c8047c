//! Minimal blocking HTTP seam used by the series sources.

use std::time::Duration;

use crate::error::SourceError;

/// Status and body of a completed GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything able to perform a GET. Transport failures are errors; any HTTP
/// status, including 4xx/5xx, is a successful response.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, SourceError>;
}

/// `reqwest` blocking client with a fixed timeout. Must not be called on an
/// async executor thread; callers wrap it in `spawn_blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("comic_viewer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::NetworkError(format!("Failed to build client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| SourceError::NetworkError(format!("Failed to GET {}: {}", url, e)))?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().map_err(|e| {
            SourceError::NetworkError(format!("Failed to read bytes from {}: {}", url, e))
        })?;

        Ok(HttpResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}

/// GET `url` and fail on any non-2xx status.
pub fn get_ok(client: &dyn HttpClient, url: &str) -> Result<HttpResponse, SourceError> {
    let resp = client.get(url)?;
    if !resp.is_success() {
        return Err(SourceError::HttpStatus {
            status: resp.status,
            url: url.to_string(),
        });
    }
    Ok(resp)
}
