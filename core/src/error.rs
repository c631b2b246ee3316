//! Error types for the posts fetch client.
//!
//! # Design
//! There is a single failure class, "the fetch failed", split by cause so
//! tests and hosts can tell them apart. None of these ever cross
//! `PostsClient::fetch_posts`, which turns every failure into an empty list.

use std::fmt;

/// Reasons a posts fetch did not produce a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response: connection refused, DNS
    /// failure, or an I/O error while reading the body.
    Transport(String),

    /// The server answered with a non-2xx status.
    Http { status: u16, body: String },

    /// The response body was not a JSON array of posts.
    Deserialization(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport failed: {msg}"),
            FetchError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            FetchError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for FetchError {}
