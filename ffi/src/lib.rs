//! C-ABI wrapper around `posts-core`.
//!
//! # Overview
//! Exposes the posts list screen to a mobile host through `extern "C"`
//! functions. Two ways in:
//! - host-does-IO: `posts_build_list_posts` hands out the request, the host
//!   runs it on its own HTTP stack and passes the response to
//!   `posts_parse_list_posts` or `posts_presenter_apply_response`;
//! - `posts_presenter_refresh` runs the GET itself (blocking) through `ureq`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The presenter keeps the fail-silent contract: a failed refresh leaves an
//!   empty collection. The returned `FfiErrorCode` tells the host why, if it
//!   cares.
//! - Change callbacks are dispatched by this layer after the presenter has
//!   finished mutating, with a snapshot of the posts, so hosts may re-enter
//!   the presenter from inside a callback.
//! - The C caller owns all returned pointers and must call the matching
//!   `posts_free_*` function to release them.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use posts_core::{HttpResponse, PostListPresenter, PostsClient, UreqTransport};

use types::*;

/// Read an optional base URL; null selects the public placeholder API.
/// Returns `None` if the string is not valid UTF-8.
fn client_from_url(base_url: *const c_char) -> Option<PostsClient> {
    if base_url.is_null() {
        return Some(PostsClient::default());
    }
    let url = unsafe { CStr::from_ptr(base_url) }.to_str().ok()?;
    Some(PostsClient::new(url))
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as the empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

fn last_failure_code(presenter: &PostListPresenter<UreqTransport>) -> FfiErrorCode {
    presenter
        .last_failure()
        .map(FfiErrorCode::from)
        .unwrap_or(FfiErrorCode::Ok)
}

/// Hand the current contents to every host subscriber.
///
/// No reference into the presenter is held while a callback runs, so a
/// callback may call back into any `posts_presenter_*` function. Subscribers
/// removed mid-dispatch are skipped, ones added mid-dispatch wait for the
/// next change, and a free requested mid-dispatch happens on the way out.
///
/// # Safety
/// `presenter` must be a live pointer from `posts_presenter_new`.
unsafe fn notify_subscribers(presenter: *mut FfiPostListPresenter) {
    let (snapshot, subscribers) = {
        let p = unsafe { &mut *presenter };
        p.dispatch_depth += 1;
        (FfiPostList::from_core(p.inner.posts()), p.subscribers.clone())
    };
    let (items, len) = {
        let list = unsafe { &*snapshot };
        (list.items as *const FfiPost, list.len)
    };

    for sub in subscribers {
        let deliver = {
            let p = unsafe { &*presenter };
            !p.free_requested && p.is_subscribed(sub.id)
        };
        if deliver {
            (sub.callback)(sub.user_data, items, len);
        }
    }

    unsafe { FfiPostList::free(snapshot) };
    let release = {
        let p = unsafe { &mut *presenter };
        p.dispatch_depth -= 1;
        p.dispatch_depth == 0 && p.free_requested
    };
    if release {
        drop(unsafe { Box::from_raw(presenter) });
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a `tracing` fmt subscriber writing to stderr at debug level.
/// Calling it more than once is harmless.
#[unsafe(no_mangle)]
pub extern "C" fn posts_logging_init() {
    let _ = catch_unwind(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `PostsClient` bound to `base_url`, or to the public
/// placeholder API when `base_url` is null. Returns null if `base_url` is
/// not valid UTF-8.
///
/// The caller must free the returned pointer with `posts_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_new(base_url: *const c_char) -> *mut FfiPostsClient {
    catch_unwind(|| match client_from_url(base_url) {
        Some(client) => Box::into_raw(Box::new(FfiPostsClient { inner: client })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `posts_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_free(client: *mut FfiPostsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Host-does-IO: build and parse
// ---------------------------------------------------------------------------

/// Build the `GET {base_url}/posts` request.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `posts_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_build_list_posts(client: *const FfiPostsClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_posts())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the response of a list-posts request.
///
/// Unlike the presenter, this reports failures: `error_code` is non-`Ok` and
/// `posts` is null when the status or body is unusable.
#[unsafe(no_mangle)]
pub extern "C" fn posts_parse_list_posts(
    client: *const FfiPostsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let core_resp = ffi_response_to_core(resp);
        let status = core_resp.status;
        match client.inner.parse_list_posts(core_resp) {
            Ok(posts) => FfiPostsResult::ok_posts(&posts, status),
            Err(e) => FfiPostsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_parse_list_posts"))
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Create a presenter with an empty collection. `base_url` follows the same
/// rules as `posts_client_new`, including null on invalid UTF-8.
///
/// The caller must free the returned pointer with `posts_presenter_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_new(base_url: *const c_char) -> *mut FfiPostListPresenter {
    catch_unwind(|| match client_from_url(base_url) {
        Some(client) => {
            let presenter = PostListPresenter::new(client, UreqTransport);
            Box::into_raw(Box::new(FfiPostListPresenter::new(presenter)))
        }
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a presenter and drop its subscriptions. Safe to call with null.
///
/// Called from inside a change callback, the free is deferred until the
/// current notification finishes and no further callbacks run.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_free(presenter: *mut FfiPostListPresenter) {
    if !presenter.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let dispatching = {
                let p = unsafe { &mut *presenter };
                if p.dispatch_depth > 0 {
                    p.free_requested = true;
                }
                p.free_requested
            };
            if !dispatching {
                drop(unsafe { Box::from_raw(presenter) });
            }
        }));
    }
}

/// Fetch the posts and replace the collection. Blocks the calling thread
/// until the request completes.
///
/// The collection is empty after any failure; the return value reports the
/// cause (`Ok` on success).
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_refresh(presenter: *mut FfiPostListPresenter) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return FfiErrorCode::NullArg;
        }
        let code = {
            let p = unsafe { &mut *presenter };
            p.inner.refresh();
            last_failure_code(&p.inner)
        };
        unsafe { notify_subscribers(presenter) };
        code
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Replace the collection from a response the host fetched itself, using the
/// request from `posts_build_list_posts`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_apply_response(
    presenter: *mut FfiPostListPresenter,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() || response.is_null() {
            return FfiErrorCode::NullArg;
        }
        let code = {
            let p = unsafe { &mut *presenter };
            let resp = unsafe { &*response };
            p.inner.apply_response(ffi_response_to_core(resp));
            last_failure_code(&p.inner)
        };
        unsafe { notify_subscribers(presenter) };
        code
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Number of posts currently in the collection; 0 for a null presenter.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_len(presenter: *const FfiPostListPresenter) -> u32 {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return 0;
        }
        let presenter = unsafe { &*presenter };
        presenter.inner.len() as u32
    }))
    .unwrap_or(0)
}

/// Copy the whole collection for a list control to render.
///
/// The caller must free the returned pointer with `posts_free_post_list`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_snapshot(presenter: *const FfiPostListPresenter) -> *mut FfiPostList {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return std::ptr::null_mut();
        }
        let presenter = unsafe { &*presenter };
        FfiPostList::from_core(presenter.inner.posts())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Selection handoff: copy the post at `index` for a detail view.
///
/// Returns null if `presenter` is null or `index` is out of range. The caller
/// must free the returned pointer with `posts_free_post`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_select(
    presenter: *const FfiPostListPresenter,
    index: u32,
) -> *mut FfiPost {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return std::ptr::null_mut();
        }
        let presenter = unsafe { &*presenter };
        match presenter.inner.select(index as usize) {
            Some(post) => Box::into_raw(Box::new(FfiPost::from_core(post))),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Register `callback`, called with `user_data` and the new contents after
/// every refresh. Returns the subscription id, or 0 if `presenter` or
/// `callback` is null.
///
/// `user_data` is passed back untouched and must stay valid until the
/// subscription is removed or the presenter is freed.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_subscribe(
    presenter: *mut FfiPostListPresenter,
    callback: Option<FfiPostsChangedCallback>,
    user_data: *mut c_void,
) -> u64 {
    catch_unwind(AssertUnwindSafe(|| {
        let Some(callback) = callback else {
            return 0;
        };
        if presenter.is_null() {
            return 0;
        }
        let p = unsafe { &mut *presenter };
        let id = p.next_subscription;
        p.next_subscription += 1;
        p.subscribers.push(FfiSubscriber {
            id,
            callback,
            user_data,
        });
        id
    }))
    .unwrap_or(0)
}

/// Remove a subscription. Returns false if `id` was not registered. Safe to
/// call from inside a change callback.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_unsubscribe(presenter: *mut FfiPostListPresenter, id: u64) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return false;
        }
        let p = unsafe { &mut *presenter };
        let before = p.subscribers.len();
        p.subscribers.retain(|s| s.id != id);
        p.subscribers.len() != before
    }))
    .unwrap_or(false)
}

/// Describe why the last refresh failed, or null if it succeeded.
///
/// The caller must free the returned string with `posts_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_presenter_last_error_message(
    presenter: *const FfiPostListPresenter,
) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if presenter.is_null() {
            return std::ptr::null_mut();
        }
        let presenter = unsafe { &*presenter };
        match presenter.inner.last_failure() {
            Some(err) => c_string(err.to_string()),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `posts_build_list_posts`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free a result returned by `posts_parse_list_posts`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_result(result: *mut FfiPostsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.posts.is_null() {
            unsafe { FfiPostList::free(result.posts) };
        }
    });
}

/// Free a list returned by `posts_presenter_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_post_list(list: *mut FfiPostList) {
    if !list.is_null() {
        let _ = catch_unwind(|| unsafe { FfiPostList::free(list) });
    }
}

/// Free a post returned by `posts_presenter_select`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_post(post: *mut FfiPost) {
    if !post.is_null() {
        let _ = catch_unwind(|| {
            let post = unsafe { Box::from_raw(post) };
            post.free_fields();
        });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
