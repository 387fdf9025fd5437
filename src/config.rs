//! Page Configuration
//!
//! Markup conventions shared with the server templates. A page can override
//! any of them by embedding a JSON object in
//! `<script id="page-ui-config" type="application/json">`.

use serde::Deserialize;
use web_sys::Document;

/// Element id of the optional embedded config block
pub const CONFIG_ELEMENT_ID: &str = "page-ui-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    // Interest toggler
    pub interest_button_selector: String,
    pub event_id_attribute: String,
    pub star_selector: String,
    pub count_class: String,
    pub attended_counter_id: String,
    pub toggle_url_prefix: String,
    pub csrf_cookie: String,
    pub csrf_header: String,

    // Logout confirmation
    pub logout_link_selector: String,
    pub logout_modal_id: String,
    pub logout_confirm_selector: String,
    pub logout_cancel_selector: String,
    pub logout_open_class: String,

    // Modal observer
    pub body_modal_class: String,
    pub debounce_ms: u32,
    pub poll_ms: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            interest_button_selector: ".interest-btn".to_string(),
            event_id_attribute: "data-event-id".to_string(),
            star_selector: ".star".to_string(),
            count_class: "interest-count".to_string(),
            attended_counter_id: "events-attended-count".to_string(),
            toggle_url_prefix: "/event/".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            logout_link_selector: "a.logout-link".to_string(),
            logout_modal_id: "logoutModal".to_string(),
            logout_confirm_selector: ".logout-confirm".to_string(),
            logout_cancel_selector: ".logout-cancel".to_string(),
            logout_open_class: "logout-open".to_string(),
            body_modal_class: "modal-opened".to_string(),
            debounce_ms: 50,
            poll_ms: 400,
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid page config: {}", e))
    }

    /// Load overrides embedded in the page, falling back to defaults
    pub fn from_page(doc: &Document) -> Self {
        let Some(raw) = doc
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[Config] {}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Selector for the count display next to an interest button
    pub fn count_selector(&self) -> String {
        format!(".{}", self.count_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = PageConfig::from_json(r#"{"debounce_ms": 120, "logout_modal_id": "signOut"}"#).unwrap();
        assert_eq!(config.debounce_ms, 120);
        assert_eq!(config.logout_modal_id, "signOut");
        assert_eq!(config.poll_ms, 400);
        assert_eq!(config.csrf_cookie, "csrftoken");
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(PageConfig::from_json(r#"{"poll_ms": "fast"}"#).is_err());
        assert!(PageConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_count_selector() {
        assert_eq!(PageConfig::default().count_selector(), ".interest-count");
    }
}
