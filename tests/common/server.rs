//! In-process mock receipt backend.
//!
//! Serves the three endpoints the pipeline depends on (`/api/ocr/`,
//! `/api/extract/`, `/api/receipts/`) with scriptable responses, and records
//! every request so tests can assert what the pipeline actually sent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::constants::*;

/// One captured submission: scalar fields plus (filename, byte count) per
/// uploaded image.
#[derive(Debug, Clone)]
pub struct CapturedSubmission {
    pub fields: HashMap<String, String>,
    pub images: Vec<(String, usize)>,
}

/// Scriptable state shared between the mock routes and the test.
pub struct BackendState {
    bearer_token: String,
    /// Text the OCR endpoint returns; may be empty to simulate a blank scan.
    pub ocr_text: Mutex<String>,
    /// Structured payload the extract endpoint returns.
    pub structured: Mutex<Value>,
    pub fail_ocr: AtomicBool,
    pub fail_structuring: AtomicBool,
    pub fail_submission: AtomicBool,
    /// Image count per OCR call.
    pub ocr_requests: Mutex<Vec<usize>>,
    /// `raw_text` per structuring call.
    pub structuring_requests: Mutex<Vec<String>>,
    pub submissions: Mutex<Vec<CapturedSubmission>>,
    next_receipt_id: AtomicI64,
}

impl BackendState {
    fn new(bearer_token: String) -> Self {
        Self {
            bearer_token,
            ocr_text: Mutex::new(LIDL_OCR_TEXT.to_string()),
            structured: Mutex::new(json!({
                "store_name": "Lidl",
                "date": "2024-03-01",
                "total_amount": "23.40",
                "category": "food",
                "products": [{"name": "Milk", "price": "2.10"}]
            })),
            fail_ocr: AtomicBool::new(false),
            fail_structuring: AtomicBool::new(false),
            fail_submission: AtomicBool::new(false),
            ocr_requests: Mutex::new(Vec::new()),
            structuring_requests: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            next_receipt_id: AtomicI64::new(1),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", self.bearer_token))
            .unwrap_or(false)
    }
}

/// Mock backend instance listening on a random local port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    /// Spawn a mock backend accepting [`TEST_TOKEN`].
    pub async fn spawn() -> Self {
        Self::spawn_with_token(TEST_TOKEN).await
    }

    pub async fn spawn_with_token(token: &str) -> Self {
        let state = Arc::new(BackendState::new(token.to_string()));
        let app = Router::new()
            .route("/api/ocr/", post(ocr_route))
            .route("/api/extract/", post(extract_route))
            .route("/api/receipts/", post(receipts_route))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend port");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend died");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

async fn ocr_route(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut image_count = 0;
    while let Some(field) = multipart.next_field().await.expect("bad multipart") {
        if field.name() == Some("images") {
            let _ = field.bytes().await.expect("bad image field");
            image_count += 1;
        }
    }
    state.ocr_requests.lock().unwrap().push(image_count);

    if state.fail_ocr.load(Ordering::Relaxed) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let text = state.ocr_text.lock().unwrap().clone();
    Json(json!({ "text": text })).into_response()
}

async fn extract_route(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut raw_text = String::new();
    while let Some(field) = multipart.next_field().await.expect("bad multipart") {
        if field.name() == Some("raw_text") {
            raw_text = field.text().await.expect("bad raw_text field");
        }
    }
    state.structuring_requests.lock().unwrap().push(raw_text);

    if state.fail_structuring.load(Ordering::Relaxed) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let structured = state.structured.lock().unwrap().clone();
    Json(structured).into_response()
}

async fn receipts_route(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut fields = HashMap::new();
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("bad multipart") {
        let name = field.name().unwrap_or("").to_string();
        if name == "images" {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.expect("bad image field");
            images.push((filename, bytes.len()));
        } else {
            let value = field.text().await.expect("bad text field");
            fields.insert(name, value);
        }
    }

    if state.fail_submission.load(Ordering::Relaxed) {
        state
            .submissions
            .lock()
            .unwrap()
            .push(CapturedSubmission { fields, images });
        return (StatusCode::BAD_REQUEST, "validation failed").into_response();
    }

    let id = state.next_receipt_id.fetch_add(1, Ordering::Relaxed);
    let products: Value = fields
        .get("products")
        .and_then(|p| serde_json::from_str(p).ok())
        .unwrap_or_else(|| json!([]));
    let image_refs: Vec<Value> = images
        .iter()
        .enumerate()
        .map(|(i, (filename, _))| {
            json!({ "id": i as i64 + 1, "image": format!("/media/receipt_images/{}", filename) })
        })
        .collect();

    let body = json!({
        "id": id,
        "store_name": fields.get("store_name").cloned().unwrap_or_default(),
        "total_amount": fields.get("total_amount").cloned().unwrap_or_default(),
        "date": fields.get("date").cloned().unwrap_or_default(),
        "category": fields.get("category").cloned().unwrap_or_default(),
        "warranty_months": fields
            .get("warranty_months")
            .and_then(|w| w.parse::<i64>().ok()),
        "products": products,
        "images": image_refs,
        "created_at": "2024-03-01T12:00:00Z"
    });

    state
        .submissions
        .lock()
        .unwrap()
        .push(CapturedSubmission { fields, images });

    (StatusCode::CREATED, Json(body)).into_response()
}
