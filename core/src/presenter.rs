//! View-model behind the posts list screen.
//!
//! # Design
//! `PostListPresenter` owns the observable post collection. A refresh runs
//! one fetch, then replaces the collection wholesale with the result, or with
//! an empty list when the fetch failed. The failure itself is kept on the
//! side in `last_failure` so a UI can decide whether to show it; the
//! collection contract stays fail-silent either way.
//!
//! Hosts that run their own HTTP stack skip `refresh` and feed the response
//! of `PostsClient::build_list_posts` into `apply_response` instead.

use tracing::debug;

use crate::client::PostsClient;
use crate::error::FetchError;
use crate::http::HttpResponse;
use crate::observable::{ObservableList, SubscriptionId};
use crate::transport::{Transport, UreqTransport};
use crate::types::Post;

#[derive(Debug)]
pub struct PostListPresenter<T = UreqTransport> {
    client: PostsClient,
    transport: T,
    posts: ObservableList<Post>,
    last_failure: Option<FetchError>,
}

impl Default for PostListPresenter<UreqTransport> {
    fn default() -> Self {
        Self::new(PostsClient::default(), UreqTransport)
    }
}

impl<T: Transport> PostListPresenter<T> {
    pub fn new(client: PostsClient, transport: T) -> Self {
        Self {
            client,
            transport,
            posts: ObservableList::new(),
            last_failure: None,
        }
    }

    /// Current contents, in server order.
    pub fn posts(&self) -> &[Post] {
        self.posts.as_slice()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The cause of the most recent failed fetch, cleared by the next
    /// successful one.
    pub fn last_failure(&self) -> Option<&FetchError> {
        self.last_failure.as_ref()
    }

    /// Register a list-rendering collaborator. It is called with the full
    /// new contents after every refresh.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Post]) + 'static) -> SubscriptionId {
        self.posts.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.posts.unsubscribe(id)
    }

    /// Fetch the posts and replace the collection with the result. Blocks
    /// the calling thread until the transport returns.
    pub fn refresh(&mut self) {
        let result = self.client.try_fetch_posts(&self.transport);
        self.apply(result);
    }

    /// The "view appeared" lifecycle signal.
    pub fn on_view_appeared(&mut self) {
        self.refresh();
    }

    /// Finish a refresh whose I/O was done by the host.
    pub fn apply_response(&mut self, response: HttpResponse) {
        let result = self.client.parse_list_posts(response);
        self.apply(result);
    }

    fn apply(&mut self, result: Result<Vec<Post>, FetchError>) {
        let posts = match result {
            Ok(posts) => {
                self.last_failure = None;
                posts
            }
            Err(error) => {
                debug!(%error, "posts fetch failed, showing empty list");
                self.last_failure = Some(error);
                Vec::new()
            }
        };
        debug!(count = posts.len(), "replacing post collection");
        self.posts.replace_all(posts);
    }

    /// Selection handoff: the record at `index`, for a detail view.
    pub fn select(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    /// Selection handoff by post id.
    pub fn select_id(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }
}
