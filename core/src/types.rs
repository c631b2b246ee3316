//! Domain DTOs for the posts resource.
//!
//! # Design
//! `Post` mirrors the `/posts` JSON schema but is defined independently from
//! the mock-server crate. Integration tests catch any schema drift between
//! the two. Unknown JSON fields are ignored so the client keeps working if
//! the server grows its payload.

use serde::{Deserialize, Serialize};

/// A single post returned by the API.
///
/// Immutable once deserialized; the only relationship it carries is the
/// unvalidated `user_id` reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}
