//! Core of the posts list/detail screen.
//!
//! # Overview
//! Fetches the `/posts` resource of a JSON placeholder API and keeps the
//! result in an observable collection a list UI binds to.
//!
//! # Design
//! - `PostsClient` is stateless; it builds the `HttpRequest` and parses the
//!   `HttpResponse`, and a `Transport` (or the host) performs the I/O.
//! - `PostsClient::fetch_posts` never fails; errors collapse to an empty list.
//! - `PostListPresenter` replaces its `ObservableList<Post>` wholesale on each
//!   refresh and hands selected posts to a detail view.
//! - Types use owned `String` / `Vec` fields so the FFI layer can copy them
//!   out without lifetimes.

pub mod client;
pub mod error;
pub mod http;
pub mod observable;
pub mod presenter;
pub mod transport;
pub mod types;

pub use client::{PostsClient, DEFAULT_BASE_URL, POSTS_PATH};
pub use error::FetchError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use observable::{ObservableList, Observer, SubscriptionId};
pub use presenter::PostListPresenter;
pub use transport::{Transport, UreqTransport};
pub use types::Post;
