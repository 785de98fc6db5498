//! Shared fixtures for larder-browser integration tests
//!
//! `MockMealDb` is a small axum server answering the four TheMealDB endpoints
//! from an in-memory catalogue.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use larder_browser::services::{LocalStore, MealDbClient, RecipeBrowser};
use larder_browser::{build_router, AppState};
use larder_common::config::RemoteApiConfig;
use larder_common::db::init_memory_database;

/// Full TheMealDB meal object
pub fn meal(id: &str, name: &str, area: &str) -> Value {
    json!({
        "idMeal": id,
        "strMeal": name,
        "strArea": area,
        "strCategory": "Misc",
        "strInstructions": format!("Cook the {} slowly.", name.to_lowercase()),
        "strMealThumb": format!("https://www.themealdb.com/images/media/meals/{}.jpg", id),
        "strYoutube": "",
        "strIngredient1": "salt",
        "strMeasure1": "1 pinch",
        "strIngredient2": "",
        "strMeasure2": " "
    })
}

#[derive(Default)]
struct Catalogue {
    meals: Vec<Value>,
    lookups: AtomicUsize,
}

/// Mock TheMealDB server
pub struct MockMealDb {
    pub base_url: String,
    catalogue: Arc<Catalogue>,
}

impl MockMealDb {
    pub async fn start(meals: Vec<Value>) -> Self {
        let catalogue = Arc::new(Catalogue {
            meals,
            lookups: AtomicUsize::new(0),
        });

        let router = Router::new()
            .route("/search.php", get(search))
            .route("/lookup.php", get(lookup))
            .route("/filter.php", get(filter))
            .with_state(catalogue.clone());

        Self {
            base_url: spawn_server(router).await,
            catalogue,
        }
    }

    /// Number of `lookup.php` calls served so far
    pub fn lookups(&self) -> usize {
        self.catalogue.lookups.load(Ordering::SeqCst)
    }
}

fn field<'a>(meal: &'a Value, name: &str) -> &'a str {
    meal[name].as_str().unwrap_or_default()
}

/// `{"meals": null}` when nothing matched, like the real API
fn meals_body(meals: Vec<Value>) -> Json<Value> {
    if meals.is_empty() {
        Json(json!({ "meals": null }))
    } else {
        Json(json!({ "meals": meals }))
    }
}

async fn search(
    State(catalogue): State<Arc<Catalogue>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let matches = if let Some(term) = params.get("s") {
        let term = term.to_lowercase();
        catalogue
            .meals
            .iter()
            .filter(|m| field(m, "strMeal").to_lowercase().contains(&term))
            .cloned()
            .collect()
    } else if let Some(letter) = params.get("f") {
        let letter = letter.to_lowercase();
        catalogue
            .meals
            .iter()
            .filter(|m| field(m, "strMeal").to_lowercase().starts_with(&letter))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    meals_body(matches)
}

async fn lookup(
    State(catalogue): State<Arc<Catalogue>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    catalogue.lookups.fetch_add(1, Ordering::SeqCst);
    let id = params.get("i").cloned().unwrap_or_default();
    let found = catalogue
        .meals
        .iter()
        .filter(|m| field(m, "idMeal") == id)
        .cloned()
        .collect();
    meals_body(found)
}

async fn filter(
    State(catalogue): State<Arc<Catalogue>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let area = params.get("a").cloned().unwrap_or_default();
    let summaries = catalogue
        .meals
        .iter()
        .filter(|m| field(m, "strArea").eq_ignore_ascii_case(&area))
        .map(|m| {
            json!({
                "idMeal": m["idMeal"],
                "strMeal": m["strMeal"],
                "strMealThumb": m["strMealThumb"]
            })
        })
        .collect();
    meals_body(summaries)
}

/// Serve `router` on an ephemeral localhost port, returning its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr = listener.local_addr().expect("Should have local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

/// Client config pointing at `base_url`
pub fn client_config(base_url: &str) -> RemoteApiConfig {
    RemoteApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        requests_per_second: 1000,
    }
}

/// Browser backed by the mock server and an in-memory store
pub async fn setup_browser(base_url: &str) -> RecipeBrowser {
    browser_with_store(base_url, setup_store().await)
}

/// Fresh in-memory local store
pub async fn setup_store() -> LocalStore {
    let pool = init_memory_database()
        .await
        .expect("Should create in-memory store");
    LocalStore::new(pool)
}

/// Browser over an existing store, e.g. to reopen it against another server
pub fn browser_with_store(base_url: &str, store: LocalStore) -> RecipeBrowser {
    let client = MealDbClient::new(&client_config(base_url)).expect("Should build client");
    RecipeBrowser::new(Arc::new(client), store)
}

/// Base URL where nothing listens (reserved port 9)
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

/// Router backed by the mock server and an in-memory store
pub async fn setup_app(base_url: &str) -> Router {
    build_router(AppState::new(setup_browser(base_url).await))
}

/// Request without a body
pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub const BOUNDARY: &str = "larder-test-boundary";

/// Build a `multipart/form-data` upload request
///
/// `image` is `(file name, bytes)`.
pub fn multipart_request(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
