//! Interest Toggler
//!
//! Posts to the per-event toggle endpoint when an interest button is clicked
//! and mirrors the server's answer into the button, its count display and the
//! "events attended" summary. Nothing changes until the server replies.

use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Headers, Request, RequestCredentials, RequestInit, Response};

use crate::config::PageConfig;
use crate::cookie;

pub const STAR_FILLED: &str = "★";
pub const STAR_EMPTY: &str = "☆";

/// Body of a successful toggle response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ToggleResponse {
    pub interested: bool,
    pub done: bool,
    pub interest_count: i64,
}

/// Change to apply to the attended summary for a past event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendedChange {
    Increment,
    Decrement,
}

/// DOM updates derived from a toggle response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestPatch {
    pub star: &'static str,
    pub pressed: &'static str,
    pub count_text: String,
    /// Create the count display when the button has none
    pub create_count: bool,
    pub attended: Option<AttendedChange>,
}

impl InterestPatch {
    pub fn from_response(resp: &ToggleResponse) -> Self {
        let attended = resp.done.then(|| {
            if resp.interested {
                AttendedChange::Increment
            } else {
                AttendedChange::Decrement
            }
        });
        Self {
            star: if resp.interested { STAR_FILLED } else { STAR_EMPTY },
            pressed: if resp.interested { "true" } else { "false" },
            count_text: resp.interest_count.to_string(),
            create_count: resp.done,
            attended,
        }
    }
}

/// What to do with the count display next to the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountAction {
    Update,
    Create,
    Leave,
}

impl InterestPatch {
    /// Update an existing count; create one only for past events
    pub fn count_action(&self, has_count: bool) -> CountAction {
        if has_count {
            CountAction::Update
        } else if self.create_count {
            CountAction::Create
        } else {
            CountAction::Leave
        }
    }
}

pub fn toggle_url(prefix: &str, event_id: &str) -> String {
    format!("{}{}/toggle-interest/", prefix, event_id)
}

/// Leading integer of `text`, or 0 when there is none
///
/// Runs of digits too long for `i64` saturate rather than reading as 0.
fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    digits
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(if sign < 0 { i64::MIN } else { i64::MAX })
}

/// New summary value, never below zero
pub fn next_attended_count(current: &str, change: AttendedChange) -> i64 {
    let current = parse_leading_int(current);
    match change {
        AttendedChange::Increment => current.saturating_add(1),
        AttendedChange::Decrement => current.saturating_sub(1).max(0),
    }
}

pub fn parse_toggle_response(body: &str) -> Result<ToggleResponse, String> {
    serde_json::from_str(body).map_err(|e| format!("Invalid toggle response: {}", e))
}

/// POST the toggle request and decode the reply
pub async fn post_toggle(config: &PageConfig, event_id: &str) -> Result<ToggleResponse, String> {
    let window = web_sys::window().ok_or("no window")?;
    let csrf = cookie::document_cookie(&config.csrf_cookie).unwrap_or_default();

    let headers = Headers::new().map_err(|_| "Failed to create headers")?;
    headers.set(&config.csrf_header, &csrf).map_err(|_| "Failed to set CSRF header")?;
    headers.set("X-Requested-With", "XMLHttpRequest").map_err(|_| "Failed to set X-Requested-With")?;
    headers.set("Content-Type", "application/json").map_err(|_| "Failed to set content-type")?;

    let body = serde_json::json!({}).to_string();
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_credentials(RequestCredentials::SameOrigin);
    opts.set_headers(&JsValue::from(&headers));
    opts.set_body(&JsValue::from_str(&body));

    let url = toggle_url(&config.toggle_url_prefix, event_id);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;
    let resp: Response = resp_value.dyn_into().map_err(|_| "Invalid response")?;
    if !resp.ok() {
        return Err(format!("{} returned HTTP {}", url, resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(|_| "No body")?)
        .await
        .map_err(|_| "Failed to read body")?;
    let text = text.as_string().ok_or("Body is not text")?;
    parse_toggle_response(&text)
}

/// Write a patch into the button and its surroundings
pub fn apply_patch(config: &PageConfig, button: &Element, patch: &InterestPatch) {
    if let Some(star) = dom_wiring::query_in(button, &config.star_selector) {
        star.set_text_content(Some(patch.star));
    }
    let _ = button.set_attribute("aria-pressed", patch.pressed);

    if let Some(parent) = button.parent_element() {
        let count = dom_wiring::query_in(&parent, &config.count_selector());
        match (patch.count_action(count.is_some()), count) {
            (CountAction::Update, Some(count)) => count.set_text_content(Some(&patch.count_text)),
            (CountAction::Create, _) => create_count(config, &parent, &patch.count_text),
            _ => {}
        }
    }

    if let Some(change) = patch.attended {
        if let Some(summary) = dom_wiring::document()
            .and_then(|doc| doc.get_element_by_id(&config.attended_counter_id))
        {
            let current = summary.text_content().unwrap_or_default();
            let next = next_attended_count(&current, change);
            summary.set_text_content(Some(&next.to_string()));
        }
    }
}

fn create_count(config: &PageConfig, parent: &Element, text: &str) {
    let Some(doc) = dom_wiring::document() else {
        return;
    };
    let Ok(span) = doc.create_element("span") else {
        return;
    };
    span.set_class_name(&config.count_class);
    span.set_text_content(Some(text));
    let _ = parent.append_child(&span);
}

/// Attach click handlers to every interest button on the page
///
/// Rapid clicks are not serialized: each click sends its own request and
/// whichever response arrives last is what the page shows.
pub fn wire(config: Rc<PageConfig>) {
    let Some(doc) = dom_wiring::document() else {
        return;
    };
    let buttons = dom_wiring::query_all(&doc, &config.interest_button_selector);
    log::debug!("[Interest] Wiring {} buttons", buttons.len());

    for button in buttons {
        let config = config.clone();
        let target = button.clone();
        dom_wiring::bind_click(&button, move |ev| {
            ev.prevent_default();
            let Some(event_id) = target
                .get_attribute(&config.event_id_attribute)
                .filter(|id| !id.is_empty())
            else {
                return;
            };
            let config = config.clone();
            let button = target.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match post_toggle(&config, &event_id).await {
                    Ok(resp) => apply_patch(&config, &button, &InterestPatch::from_response(&resp)),
                    Err(e) => log::error!("[Interest] Error toggling interest for event {}: {}", event_id, e),
                }
            });
        });
    }
}
