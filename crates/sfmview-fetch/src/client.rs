use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::FetchError;

/// A response received from the asset storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body, empty for unsuccessful responses.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A client able to download a URL.
///
/// Unsuccessful statuses are returned as responses. Errors are reserved for
/// failures where no response was received.
pub trait HttpClient {
    /// Download the body of a URL.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send;
}

impl HttpClient for reqwest::Client {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = reqwest::Client::get(self, url).send().await?;
        let status = response.status();
        let body = if status.is_success() {
            response.bytes().await?.to_vec()
        } else {
            Vec::new()
        };
        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// In-memory asset storage.
///
/// Unknown URLs answer with a 404 status. Every request is recorded.
#[derive(Debug, Default)]
pub struct MemoryClient {
    routes: HashMap<String, Result<HttpResponse, String>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryClient {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a body with a 200 status.
    pub fn insert(&mut self, url: impl Into<String>, body: Vec<u8>) {
        self.routes
            .insert(url.into(), Ok(HttpResponse { status: 200, body }));
    }

    /// Answer a URL with an empty body and the given status.
    pub fn insert_status(&mut self, url: impl Into<String>, status: u16) {
        self.routes.insert(
            url.into(),
            Ok(HttpResponse {
                status,
                body: Vec::new(),
            }),
        );
    }

    /// Fail a URL with a transport error.
    pub fn insert_transport_error(&mut self, url: impl Into<String>, message: impl Into<String>) {
        self.routes.insert(url.into(), Err(message.into()));
    }

    /// The requested URLs, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn respond(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match self.routes.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(FetchError::Transport(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

impl HttpClient for MemoryClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.respond(url)
    }
}
