use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::Router;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// A canned failure served by `GET /posts` instead of the stored list.
#[derive(Clone, Debug)]
pub enum Fault {
    /// Respond with this status and an empty body.
    Status(u16),
    /// Respond 200 with this raw body, typically malformed JSON.
    Body(String),
}

pub type Db = Arc<RwLock<Vec<Post>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    fault: Option<Fault>,
}

/// Three posts in the shape jsonplaceholder serves.
pub fn sample_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            user_id: 1,
            title: "sunt aut facere repellat provident".to_string(),
            body: "quia et suscipit\nsuscipit recusandae".to_string(),
        },
        Post {
            id: 2,
            user_id: 1,
            title: "qui est esse".to_string(),
            body: "est rerum tempore vitae".to_string(),
        },
        Post {
            id: 3,
            user_id: 2,
            title: "ea molestias quasi exercitationem".to_string(),
            body: "et iusto sed quo iure".to_string(),
        },
    ]
}

pub fn app() -> Router {
    app_with_posts(sample_posts())
}

pub fn app_with_posts(posts: Vec<Post>) -> Router {
    router(AppState {
        db: Arc::new(RwLock::new(posts)),
        fault: None,
    })
}

pub fn app_with_fault(fault: Fault) -> Router {
    router(AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        fault: Some(fault),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).delete(delete_post))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn list_posts(State(state): State<AppState>) -> Response {
    match state.fault {
        Some(Fault::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Fault::Body(body)) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        None => {
            let posts = state.db.read().await;
            Json(posts.clone()).into_response()
        }
    }
}

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> (StatusCode, Json<Post>) {
    let mut posts = state.db.write().await;
    let id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let post = Post {
        id,
        user_id: input.user_id,
        title: input.title,
        body: input.body,
    };
    posts.push(post.clone());
    (StatusCode::CREATED, Json(post))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, StatusCode> {
    let posts = state.db.read().await;
    posts
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut posts = state.db.write().await;
    let index = posts.iter().position(|p| p.id == id).ok_or(StatusCode::NOT_FOUND)?;
    posts.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_user_id_as_camel_case() {
        let post = Post {
            id: 1,
            user_id: 4,
            title: "Test".to_string(),
            body: "Body".to_string(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["userId"], 4);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["body"], "Body");
    }

    #[test]
    fn create_post_defaults_body_to_empty() {
        let input: CreatePost = serde_json::from_str(r#"{"userId":1,"title":"No body"}"#).unwrap();
        assert_eq!(input.title, "No body");
        assert!(input.body.is_empty());
    }

    #[test]
    fn create_post_rejects_missing_title() {
        let result: Result<CreatePost, _> = serde_json::from_str(r#"{"userId":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sample_posts_have_unique_ids() {
        let posts = sample_posts();
        let mut ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), posts.len());
    }
}
