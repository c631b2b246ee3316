//! Stateless request builder, response parser and fail-silent fetch for the
//! posts resource.
//!
//! # Design
//! `PostsClient` holds only a `base_url`. Listing posts is split into
//! `build_list_posts` (produces an `HttpRequest`) and `parse_list_posts`
//! (consumes an `HttpResponse`) so a host can run the I/O itself.
//! `try_fetch_posts` glues the two together through a `Transport` and keeps
//! the error; `fetch_posts` is the public fail-silent entry point that maps
//! every failure to an empty list.

use tracing::debug;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::Post;

/// Base URL of the public placeholder API.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Resource path appended to the base URL.
pub const POSTS_PATH: &str = "posts";

/// Synchronous, stateless client for the posts resource.
#[derive(Debug, Clone)]
pub struct PostsClient {
    base_url: String,
}

impl Default for PostsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}/posts` with no headers, query or body.
    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{POSTS_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Accepts any 2xx status and deserializes the body as-is, in server
    /// order.
    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, FetchError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| FetchError::Deserialization(e.to_string()))
    }

    /// Build, execute and parse, keeping the failure cause.
    pub fn try_fetch_posts<T: Transport + ?Sized>(&self, transport: &T) -> Result<Vec<Post>, FetchError> {
        let response = transport.execute(self.build_list_posts())?;
        self.parse_list_posts(response)
    }

    /// Fetch the posts list. Never fails: any error yields an empty list,
    /// indistinguishable from a server that has no posts.
    pub fn fetch_posts<T: Transport + ?Sized>(&self, transport: &T) -> Vec<Post> {
        self.try_fetch_posts(transport).unwrap_or_else(|error| {
            debug!(%error, "posts fetch failed, returning empty list");
            Vec::new()
        })
    }
}

/// Map non-2xx status codes to `FetchError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    Err(FetchError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
