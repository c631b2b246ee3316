//! The seam where an `HttpRequest` turns into an `HttpResponse`.
//!
//! `PostsClient` never touches the network itself. A `Transport` executes the
//! request it builds; `UreqTransport` does so with a blocking `ureq` agent,
//! and any closure with the right signature works as a stand-in.

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok` data and reserve
/// `Err` for failures that produced no response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, FetchError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        self(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// Every call builds its own agent, so the connection pool lives exactly as
/// long as the call and is dropped on both the success and the error path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let mut builder = match request.method {
            HttpMethod::Get => agent.get(&request.path),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
