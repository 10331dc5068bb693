use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: u32,
    pub title: String,
    pub issue_number: u32,
}

#[derive(Deserialize)]
pub struct LargeQuery {
    pub bytes: usize,
}

#[derive(Deserialize)]
pub struct ComicQuery {
    pub limit: Option<usize>,
    pub title: Option<String>,
}

pub type Catalog = Arc<Vec<Comic>>;

/// Fixed catalog served by every instance.
pub fn catalog() -> Vec<Comic> {
    vec![
        Comic {
            id: 1,
            title: "Amazing Fantasy".to_string(),
            issue_number: 15,
        },
        Comic {
            id: 2,
            title: "Fantastic Four".to_string(),
            issue_number: 1,
        },
        Comic {
            id: 3,
            title: "The Amazing Spider-Man".to_string(),
            issue_number: 1,
        },
    ]
}

pub fn app() -> Router {
    let catalog: Catalog = Arc::new(catalog());
    Router::new()
        .route("/comics", get(list_comics))
        .route("/comics/{id}", get(get_comic))
        .route("/headers", get(echo_headers))
        .route("/malformed", get(malformed))
        .route("/empty", get(empty))
        .route("/redirect", get(redirect))
        .route("/large", get(large))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_comics(
    State(catalog): State<Catalog>,
    Query(query): Query<ComicQuery>,
) -> Json<Value> {
    let results: Vec<&Comic> = catalog
        .iter()
        .filter(|comic| match &query.title {
            Some(title) => comic.title.contains(title.as_str()),
            None => true,
        })
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Json(json!({
        "code": 200,
        "data": { "count": results.len(), "results": results },
    }))
}

async fn get_comic(
    State(catalog): State<Catalog>,
    Path(id): Path<u32>,
) -> Result<Json<Comic>, (StatusCode, Json<Value>)> {
    catalog
        .iter()
        .find(|comic| comic.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "code": 404, "status": "We couldn't find that comic" })),
            )
        })
}

/// Echo the received request headers back as a JSON object.
async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let mut echoed = Map::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        echoed.insert(name.as_str().to_string(), Value::String(value));
    }
    Json(Value::Object(echoed))
}

async fn malformed() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{xx}}")
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/comics/1")])
}

/// A JSON object whose `padding` string is `bytes` long.
async fn large(Query(query): Query<LargeQuery>) -> Json<Value> {
    Json(json!({ "padding": "x".repeat(query.bytes) }))
}
