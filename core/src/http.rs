//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `PostsClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; whoever executes the round-trip
//! in between (a `Transport`, or the mobile host through the FFI) owns the
//! network. All fields are owned so values cross the C boundary without
//! lifetime concerns.

/// HTTP method for a request. The posts resource is read-only from the
/// client's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Status codes outside 2xx are carried here as data; interpreting them is
/// `PostsClient::parse_list_posts`' job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
