use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_fault, app_with_posts, sample_posts, Fault, Post};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_posts_returns_seeded_posts_in_order() {
    let resp = app().oneshot(get("/posts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts, sample_posts());
}

#[tokio::test]
async fn list_posts_empty() {
    let resp = app_with_posts(Vec::new()).oneshot(get("/posts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"[]");
}

#[tokio::test]
async fn list_posts_uses_camel_case_user_id() {
    let resp = app().oneshot(get("/posts")).await.unwrap();
    let raw: serde_json::Value = body_json(resp).await;
    assert_eq!(raw[0]["userId"], 1);
    assert!(raw[0].get("user_id").is_none());
}

// --- faults ---

#[tokio::test]
async fn status_fault_is_served() {
    let resp = app_with_fault(Fault::Status(503))
        .oneshot(get("/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn body_fault_is_served_verbatim() {
    let resp = app_with_fault(Fault::Body("[{".to_string()))
        .oneshot(get("/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"[{");
}

// --- get ---

#[tokio::test]
async fn get_post_found() {
    let resp = app().oneshot(get("/posts/2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let post: Post = body_json(resp).await;
    assert_eq!(post.id, 2);
    assert_eq!(post.title, "qui est esse");
}

#[tokio::test]
async fn get_post_not_found() {
    let resp = app().oneshot(get("/posts/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_post_bad_id_returns_400() {
    let resp = app().oneshot(get("/posts/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_post_returns_201_with_next_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/posts",
            r#"{"userId":5,"title":"New","body":"Text"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Post = body_json(resp).await;
    assert_eq!(post.id, 4);
    assert_eq!(post.user_id, 5);
    assert_eq!(post.title, "New");
}

#[tokio::test]
async fn create_post_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/posts", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- delete ---

#[tokio::test]
async fn delete_post_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/posts/999")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn create_then_delete_lifecycle() {
    use tower::Service;

    let mut app = app_with_posts(Vec::new()).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/posts", r#"{"userId":1,"title":"Only"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Post = body_json(resp).await;
    assert_eq!(created.id, 1);

    // list — one post
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get("/posts")).await.unwrap();
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts, vec![created.clone()]);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/posts/{}", created.id))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete — empty
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get("/posts")).await.unwrap();
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());
}
