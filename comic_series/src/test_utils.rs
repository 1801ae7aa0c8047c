//! Scripted HTTP client for source tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SourceError;
use crate::http::{HttpClient, HttpResponse};

enum Reply {
    Status(u16, String),
    Fail,
}

/// Answers GETs from a fixed table and records every requested URL.
/// Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct ScriptedClient {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, url: &str, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Status(200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Status(status, String::new()));
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Fail);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

impl HttpClient for ScriptedClient {
    fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Status(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone().into_bytes(),
            }),
            Some(Reply::Fail) | None => Err(SourceError::NetworkError(format!(
                "Failed to GET {}: connection refused",
                url
            ))),
        }
    }
}
