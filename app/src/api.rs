//! Backend API client module
//!
//! Type-safe wrappers around the catalog backend's HTTP endpoints, plus the
//! request tracking that drives the global progress bar. Every request goes
//! through [`ApiClient::fetch_json`], so every request — success or failure —
//! is counted exactly once.

use std::cell::Cell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

use crate::types::{MessageResponse, Product, ProductDraft, SearchByImageResponse, UpdateResponse};

/// Fallback backend origin when no override is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ─────────────────────────────────────────────────────────────────────────────
// Request Tracking
// ─────────────────────────────────────────────────────────────────────────────

/// Callbacks fired at the edges of the in-flight window: `on_start` when the
/// number of outstanding requests goes 0→1, `on_end` when it returns to 0.
///
/// This pair is the whole contract between the request layer and the progress
/// indicator — the tracker knows nothing about what the callbacks do.
pub struct RequestHooks {
    on_start: Box<dyn Fn()>,
    on_end: Box<dyn Fn()>,
}

impl RequestHooks {
    pub fn new(on_start: impl Fn() + 'static, on_end: impl Fn() + 'static) -> Self {
        Self {
            on_start: Box::new(on_start),
            on_end: Box::new(on_end),
        }
    }

    /// Hooks that do nothing. Useful for headless construction in tests.
    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }
}

/// Collapses any number of concurrently outstanding requests into a single
/// start/end signal.
///
/// The counter never goes below zero: an unmatched completion is clamped and
/// does not re-fire `on_end`. Single-threaded (wasm event loop), so plain
/// `Cell` state is enough.
pub struct RequestTracker {
    in_flight: Cell<u32>,
    hooks: RequestHooks,
}

impl RequestTracker {
    pub fn new(hooks: RequestHooks) -> Self {
        Self {
            in_flight: Cell::new(0),
            hooks,
        }
    }

    /// Record one request starting. The returned guard records the matching
    /// completion when dropped — on *every* exit path, including errors, so a
    /// failed request can never leave the indicator stuck active.
    pub fn begin(self: &Rc<Self>) -> InFlightGuard {
        let n = self.in_flight.get();
        self.in_flight.set(n + 1);
        if n == 0 {
            (self.hooks.on_start)();
        }
        InFlightGuard {
            tracker: Rc::clone(self),
        }
    }

    fn finish(&self) {
        let n = self.in_flight.get();
        if n == 0 {
            // Unmatched completion: stay at zero rather than going negative.
            return;
        }
        self.in_flight.set(n - 1);
        if n == 1 {
            (self.hooks.on_end)();
        }
    }

    /// Number of currently outstanding requests.
    pub fn in_flight(&self) -> u32 {
        self.in_flight.get()
    }
}

/// One outstanding request. Dropping it counts as completion.
pub struct InFlightGuard {
    tracker: Rc<RequestTracker>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Extract a readable message from a JS error value.
fn js_error(context: &str, e: &JsValue) -> String {
    match e.as_string() {
        Some(msg) => format!("{context}: {msg}"),
        None => format!("{context}: {e:?}"),
    }
}

/// Deserialize a JsValue into a type, with a readable error.
fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| format!("response decode failed: {e}"))
}

/// Backend base URL: a `window.__CATALOG_API_URL` override if the host page
/// set one, otherwise the default local backend.
pub fn default_base_url() -> String {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__CATALOG_API_URL")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Proxied thumbnail URL for an uploaded image asset.
pub fn thumbnail_url(base_url: &str, image_id: i64, width: u32, height: u32) -> String {
    format!("{base_url}/proxy-image-thumbnail/{image_id}?w={width}&h={height}&format=webp&q=80")
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Upload Payload
// ─────────────────────────────────────────────────────────────────────────────

/// An image read from a file input, ready to be sent as a multipart part.
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: String, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// MIME type guessed from the file extension; the backend only forwards
    /// it, so a generic fallback is fine.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.filename.to_lowercase();
        if lower.ends_with(".png") {
            "image/png"
        } else if lower.ends_with(".webp") {
            "image/webp"
        } else if lower.ends_with(".gif") {
            "image/gif"
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            "image/jpeg"
        } else {
            "application/octet-stream"
        }
    }

    fn to_blob(&self) -> Result<Blob, String> {
        let parts = js_sys::Array::new();
        parts.push(js_sys::Uint8Array::from(self.bytes.as_slice()).as_ref());
        let opts = BlobPropertyBag::new();
        opts.set_type(self.mime_type());
        Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|e| js_error("blob construction failed", &e))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the product backend.
///
/// Constructed once at app start with the progress hooks and handed to
/// components through context. Cloning shares the tracker, so concurrent
/// requests from different screens are counted together.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<String>,
    tracker: Rc<RequestTracker>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, hooks: RequestHooks) -> Self {
        Self {
            base_url: Rc::new(base_url.into()),
            tracker: Rc::new(RequestTracker::new(hooks)),
        }
    }

    /// Thumbnail URL for a product's uploaded image.
    pub fn thumbnail_url(&self, image_id: i64, width: u32, height: u32) -> String {
        thumbnail_url(&self.base_url, image_id, width, height)
    }

    /// Issue a request and decode the JSON response, holding an in-flight
    /// guard for the full duration. JS rejections (network failures, CORS)
    /// surface as `Err` after the guard has already counted the completion.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<&FormData>,
    ) -> Result<T, String> {
        let _guard = self.tracker.begin();

        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(form) = body {
            opts.set_body(form.as_ref());
        }

        let url = format!("{}{}", self.base_url, path);
        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| js_error("request build failed", &e))?;

        let window = web_sys::window().ok_or("no window")?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("network error", &e))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| "fetch did not return a Response".to_string())?;

        if !response.ok() {
            return Err(format!("{method} {path}: HTTP {}", response.status()));
        }

        let json = JsFuture::from(response.json().map_err(|e| js_error("body read failed", &e))?)
            .await
            .map_err(|e| js_error("body read failed", &e))?;
        from_js(json)
    }

    // ─── Product CRUD ────────────────────────────────────────────────────────

    /// Fetch the full product list.
    pub async fn get_products(&self) -> Result<Vec<Product>, String> {
        self.fetch_json("GET", "/products", None).await
    }

    /// Fetch a single product by id.
    pub async fn get_product(&self, id: &str) -> Result<Product, String> {
        self.fetch_json("GET", &format!("/products/{id}"), None)
            .await
    }

    /// Create a product. The backend requires an image on creation.
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        image: &ImageUpload,
    ) -> Result<Product, String> {
        let form = draft_form(draft, Some(image))?;
        self.fetch_json("POST", "/products", Some(&form)).await
    }

    /// Update a product; a new image replaces the old one on the backend.
    pub async fn update_product(
        &self,
        id: &str,
        draft: &ProductDraft,
        image: Option<&ImageUpload>,
    ) -> Result<Product, String> {
        let form = draft_form(draft, image)?;
        let resp: UpdateResponse = self
            .fetch_json("PATCH", &format!("/products/{id}"), Some(&form))
            .await?;
        Ok(resp.data)
    }

    /// Delete a product (the backend also deletes its image asset).
    pub async fn delete_product(&self, id: &str) -> Result<(), String> {
        let _resp: MessageResponse = self
            .fetch_json("DELETE", &format!("/products/{id}"), None)
            .await?;
        Ok(())
    }

    // ─── Image Search ────────────────────────────────────────────────────────

    /// Find products whose image is visually similar to the uploaded one.
    pub async fn search_by_image(
        &self,
        image: &ImageUpload,
    ) -> Result<SearchByImageResponse, String> {
        let form = FormData::new().map_err(|e| js_error("form construction failed", &e))?;
        form.append_with_blob_and_filename("file", &image.to_blob()?, &image.filename)
            .map_err(|e| js_error("form append failed", &e))?;
        self.fetch_json("POST", "/search-by-image", Some(&form))
            .await
    }
}

/// Build the multipart body for create/update from the form draft.
fn draft_form(draft: &ProductDraft, image: Option<&ImageUpload>) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| js_error("form construction failed", &e))?;
    let append = |key: &str, value: &str| {
        form.append_with_str(key, value)
            .map_err(|e| js_error("form append failed", &e))
    };
    append("name", &draft.name)?;
    append("description", &draft.description)?;
    append("price", &draft.price.to_string())?;
    append("stock", &draft.stock.to_string())?;
    append("status", draft.status.as_str())?;
    append("category", &draft.category)?;
    if let Some(img) = image {
        form.append_with_blob_and_filename("image", &img.to_blob()?, &img.filename)
            .map_err(|e| js_error("form append failed", &e))?;
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Tracker wired to counters recording how often each hook fired.
    fn counting_tracker() -> (Rc<RequestTracker>, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let starts = Rc::new(Cell::new(0u32));
        let ends = Rc::new(Cell::new(0u32));
        let tracker = {
            let starts = Rc::clone(&starts);
            let ends = Rc::clone(&ends);
            Rc::new(RequestTracker::new(RequestHooks::new(
                move || starts.set(starts.get() + 1),
                move || ends.set(ends.get() + 1),
            )))
        };
        (tracker, starts, ends)
    }

    #[test]
    fn test_single_request_fires_both_edges() {
        let (tracker, starts, ends) = counting_tracker();
        let guard = tracker.begin();
        assert_eq!(starts.get(), 1);
        assert_eq!(ends.get(), 0);
        assert_eq!(tracker.in_flight(), 1);
        drop(guard);
        assert_eq!(ends.get(), 1);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_overlapping_requests_fire_edges_once() {
        // Start A, B, C; complete B (failure), A, C. Exactly one on_start at
        // the first start and one on_end at the last completion.
        let (tracker, starts, ends) = counting_tracker();
        let a = tracker.begin();
        let b = tracker.begin();
        let c = tracker.begin();
        assert_eq!(tracker.in_flight(), 3);
        assert_eq!(starts.get(), 1);

        drop(b); // failed request still counts as a completion
        drop(a);
        assert_eq!(ends.get(), 0, "still one request outstanding");
        drop(c);
        assert_eq!(starts.get(), 1);
        assert_eq!(ends.get(), 1);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_interleaved_bursts() {
        // A second burst after the first fully drains fires a fresh pair.
        let (tracker, starts, ends) = counting_tracker();
        drop(tracker.begin());
        assert_eq!((starts.get(), ends.get()), (1, 1));
        let g1 = tracker.begin();
        let g2 = tracker.begin();
        drop(g1);
        drop(g2);
        assert_eq!((starts.get(), ends.get()), (2, 2));
    }

    #[test]
    fn test_unmatched_completion_clamps_at_zero() {
        let (tracker, _starts, ends) = counting_tracker();
        tracker.finish();
        tracker.finish();
        assert_eq!(tracker.in_flight(), 0);
        assert_eq!(ends.get(), 0, "no spurious on_end");
    }

    #[test]
    fn test_active_window_covers_all_interleavings() {
        // active (= started and not yet ended) must hold continuously from the
        // first start to the last completion, for any completion order.
        let (tracker, starts, ends) = counting_tracker();
        let active = |starts: &Rc<Cell<u32>>, ends: &Rc<Cell<u32>>| starts.get() > ends.get();

        let mut guards: Vec<InFlightGuard> = (0..5).map(|_| tracker.begin()).collect();
        // Complete in a scrambled order.
        for idx in [3, 0, 2, 0] {
            guards.remove(idx);
            assert!(active(&starts, &ends));
        }
        guards.clear();
        assert!(!active(&starts, &ends));
        assert_eq!((starts.get(), ends.get()), (1, 1));
    }

    #[test]
    fn test_error_path_releases_guard() {
        // A request body that takes the `?` early-return still completes.
        let (tracker, _starts, ends) = counting_tracker();
        let failing = |tracker: &Rc<RequestTracker>| -> Result<(), String> {
            let _guard = tracker.begin();
            Err("boom")?
        };
        assert!(failing(&tracker).is_err());
        assert_eq!(tracker.in_flight(), 0);
        assert_eq!(ends.get(), 1);
    }

    #[test]
    fn test_hook_order_is_recorded() {
        // on_start observed strictly before on_end across a burst.
        let log = Rc::new(RefCell::new(Vec::new()));
        let tracker = {
            let l1 = Rc::clone(&log);
            let l2 = Rc::clone(&log);
            Rc::new(RequestTracker::new(RequestHooks::new(
                move || l1.borrow_mut().push("start"),
                move || l2.borrow_mut().push("end"),
            )))
        };
        let a = tracker.begin();
        let b = tracker.begin();
        drop(a);
        drop(b);
        assert_eq!(*log.borrow(), vec!["start", "end"]);
    }

    #[test]
    fn test_noop_hooks() {
        let tracker = Rc::new(RequestTracker::new(RequestHooks::noop()));
        drop(tracker.begin());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("http://localhost:8000", 42, 300, 300),
            "http://localhost:8000/proxy-image-thumbnail/42?w=300&h=300&format=webp&q=80"
        );
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(ImageUpload::new("a.PNG".into(), vec![]).mime_type(), "image/png");
        assert_eq!(ImageUpload::new("a.jpeg".into(), vec![]).mime_type(), "image/jpeg");
        assert_eq!(ImageUpload::new("a.bin".into(), vec![]).mime_type(), "application/octet-stream");
    }
}
