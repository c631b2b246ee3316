//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use posts_core::{FetchError, HttpMethod, Post, PostListPresenter, PostsClient, UreqTransport};

/// Opaque handle to a `PostsClient`.
pub struct FfiPostsClient {
    pub(crate) inner: PostsClient,
}

/// Opaque handle to a `PostListPresenter` that does its own I/O through
/// `ureq` on `refresh`, plus the host's change subscriptions.
///
/// Host callbacks run only after the presenter has finished mutating, and
/// may re-enter any `posts_presenter_*` function, including
/// `posts_presenter_free`, which is deferred until dispatch unwinds.
pub struct FfiPostListPresenter {
    pub(crate) inner: PostListPresenter<UreqTransport>,
    pub(crate) subscribers: Vec<FfiSubscriber>,
    pub(crate) next_subscription: u64,
    pub(crate) dispatch_depth: u32,
    pub(crate) free_requested: bool,
}

impl FfiPostListPresenter {
    pub(crate) fn new(inner: PostListPresenter<UreqTransport>) -> Self {
        Self {
            inner,
            subscribers: Vec::new(),
            next_subscription: 1,
            dispatch_depth: 0,
            free_requested: false,
        }
    }

    pub(crate) fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }
}

/// Invoked after every collection replacement with the caller's `user_data`
/// and the new contents. `posts` points to `len` items (null when empty) and
/// is only valid for the duration of the call.
pub type FfiPostsChangedCallback = extern "C" fn(user_data: *mut c_void, posts: *const FfiPost, len: u32);

/// One host subscription.
#[derive(Clone, Copy)]
pub(crate) struct FfiSubscriber {
    pub(crate) id: u64,
    pub(crate) callback: FfiPostsChangedCallback,
    pub(crate) user_data: *mut c_void,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `posts_build_list_posts`. The host executes it and passes the
/// response back through `posts_parse_list_posts` or
/// `posts_presenter_apply_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: posts_core::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            // Boxed slice so capacity == len when the free function rebuilds it.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host builds this on the stack after executing a request. The FFI layer
/// reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Post types
// ---------------------------------------------------------------------------

/// A single post exposed to C.
#[repr(C)]
pub struct FfiPost {
    pub id: i64,
    pub user_id: i64,
    pub title: *mut c_char,
    pub body: *mut c_char,
}

impl FfiPost {
    pub(crate) fn from_core(post: &Post) -> Self {
        FfiPost {
            id: post.id,
            user_id: post.user_id,
            title: c_string(post.title.clone()),
            body: c_string(post.body.clone()),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        if !self.title.is_null() {
            drop(unsafe { CString::from_raw(self.title) });
        }
        if !self.body.is_null() {
            drop(unsafe { CString::from_raw(self.body) });
        }
    }
}

/// A list of posts exposed to C, in server order.
#[repr(C)]
pub struct FfiPostList {
    pub items: *mut FfiPost,
    pub len: u32,
}

impl FfiPostList {
    pub(crate) fn from_core(posts: &[Post]) -> *mut Self {
        let len = posts.len() as u32;
        let items = if posts.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_posts: Vec<FfiPost> = posts.iter().map(FfiPost::from_core).collect();
            Box::into_raw(ffi_posts.into_boxed_slice()) as *mut FfiPost
        };
        Box::into_raw(Box::new(FfiPostList { items, len }))
    }

    /// Free a list built by `from_core`, including every post's strings.
    pub(crate) unsafe fn free(list: *mut Self) {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
            let items = unsafe { Box::from_raw(slice) };
            for item in items.iter() {
                item.free_fields();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned by parse and presenter functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Deserialization = 2,
    Transport = 3,
    Panic = 4,
    NullArg = 5,
}

impl From<&FetchError> for FfiErrorCode {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Transport(_) => FfiErrorCode::Transport,
            FetchError::Http { .. } => FfiErrorCode::Http,
            FetchError::Deserialization(_) => FfiErrorCode::Deserialization,
        }
    }
}

/// Result envelope for `posts_parse_list_posts`.
///
/// On success `error_code` is `Ok`, `error_message` is null, `http_status`
/// carries the 2xx code and `posts` points to the parsed list. On failure `error_code` names the category,
/// `error_message` is a human-readable C string and `posts` is null.
#[repr(C)]
pub struct FfiPostsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub posts: *mut FfiPostList,
}

impl FfiPostsResult {
    pub(crate) fn ok_posts(posts: &[Post], http_status: u16) -> *mut Self {
        Box::into_raw(Box::new(FfiPostsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status,
            posts: FfiPostList::from_core(posts),
        }))
    }

    pub(crate) fn from_error(err: FetchError) -> *mut Self {
        let http_status = match &err {
            FetchError::Http { status, .. } => *status,
            _ => 0,
        };
        Box::into_raw(Box::new(FfiPostsResult {
            error_code: FfiErrorCode::from(&err),
            error_message: c_string(err.to_string()),
            http_status,
            posts: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiPostsResult {
            error_code,
            error_message: c_string(msg.to_string()),
            http_status: 0,
            posts: std::ptr::null_mut(),
        }))
    }
}

/// Convert to an owned C string, dropping interior NUL bytes rather than
/// failing.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}
