use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use firewatch_core::{
    fetch_with_fallback, Boundary, Classifier, FetchError, FetchOutcome, Snapshot, SourceStrategy,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::state::{close_gate, WebState};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const FALLBACK_PATH: &str = "active_fires.json";
const BOUNDARY_PATH: &str = "uttarakhand_boundary.geojson";
const DAYS: u32 = 10;
const REFRESH_MINUTES: i32 = 30;
const STATIC_REFRESH_MINUTES: i32 = 180;

fn strategy() -> SourceStrategy {
    match option_env!("FIREWATCH_STATIC_ONLY") {
        Some("1" | "true" | "yes") => SourceStrategy::FallbackOnly,
        _ => SourceStrategy::PrimaryWithFallback,
    }
}

fn api_url() -> String {
    let base = option_env!("FIREWATCH_API_URL").unwrap_or(DEFAULT_API_URL);
    format!("{}/api/fires?days={DAYS}", base.trim_end_matches('/'))
}

pub fn refresh_interval_ms() -> i32 {
    let minutes = match strategy() {
        SourceStrategy::PrimaryWithFallback => REFRESH_MINUTES,
        SourceStrategy::FallbackOnly => STATIC_REFRESH_MINUTES,
    };
    minutes * 60 * 1000
}

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

async fn fetch_text(url: &str, mode: RequestMode) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NotConfigured)?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(mode);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|error| FetchError::Network(js_error(&error)))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|error| FetchError::Network(js_error(&error)))?
        .dyn_into()
        .map_err(|_| FetchError::Malformed("fetch did not return a Response".to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = response
        .text()
        .map_err(|error| FetchError::Network(js_error(&error)))?;
    JsFuture::from(text)
        .await
        .map_err(|error| FetchError::Network(js_error(&error)))?
        .as_string()
        .ok_or_else(|| FetchError::Malformed("body is not text".to_string()))
}

async fn fetch_snapshot(
    classifier: &Classifier,
    url: &str,
    mode: RequestMode,
) -> Result<Snapshot, FetchError> {
    let body = fetch_text(url, mode).await?;
    Ok(classifier.parse(body.as_bytes())?)
}

/// One refresh cycle. Skipped while another is in flight; the result is
/// dropped when the page tore the refresher down in the meantime.
pub async fn refresh(state: Rc<RefCell<WebState>>) {
    let Some(ticket) = state.borrow_mut().gate.try_begin() else {
        return;
    };

    let classifier = Classifier::new();
    let api = api_url();
    let outcome = fetch_with_fallback(
        strategy(),
        || fetch_snapshot(&classifier, &api, RequestMode::Cors),
        || fetch_snapshot(&classifier, FALLBACK_PATH, RequestMode::SameOrigin),
    )
    .await;

    if matches!(outcome, FetchOutcome::Failed { .. }) {
        web_sys::console::error_1(&format!("Failed to refresh fires: {}", outcome.summary()).into());
    }

    let mut state = state.borrow_mut();
    if state.gate.finish(ticket) {
        state.feed.apply(outcome, Utc::now());
        state.clamp_selection();
    }
}

/// Loads the region outline once. Failures only leave the overlay off.
pub async fn load_boundary(state: Rc<RefCell<WebState>>) {
    let text = match fetch_text(BOUNDARY_PATH, RequestMode::SameOrigin).await {
        Ok(text) => text,
        Err(error) => {
            web_sys::console::error_1(&format!("Boundary not loaded: {error}").into());
            return;
        }
    };

    match Boundary::from_geojson_str(&text) {
        Ok(boundary) => state.borrow_mut().boundary = Some(boundary),
        Err(error) => {
            web_sys::console::error_1(&format!("Boundary ignored: {error}").into());
        }
    }
}

/// A `setInterval` registration, cleared when dropped.
pub struct IntervalHandle {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    pub fn start(period_ms: i32, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref::<js_sys::Function>(),
            period_ms,
        )?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

/// Periodic refresher for the page. Dropping it stops the timer and
/// discards any fetch still running.
pub struct Refresher {
    _interval: IntervalHandle,
    state: Rc<RefCell<WebState>>,
}

impl Refresher {
    pub fn start(state: &Rc<RefCell<WebState>>) -> Result<Self, JsValue> {
        let timer_state = Rc::clone(state);
        let interval = IntervalHandle::start(refresh_interval_ms(), move || {
            spawn_local(refresh(Rc::clone(&timer_state)));
        })?;
        spawn_local(refresh(Rc::clone(state)));

        Ok(Self {
            _interval: interval,
            state: Rc::clone(state),
        })
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        if !close_gate(&self.state) {
            web_sys::console::warn_1(
                &"Refresher dropped while the page state was borrowed; refresh gate left open".into(),
            );
        }
    }
}
