//! Logout Confirmation
//!
//! Logout links open a confirmation overlay instead of navigating. The
//! link's target is remembered until the user confirms or dismisses.

use std::cell::RefCell;
use std::rc::Rc;

use dom_wiring::{ClickKind, ClickModifiers};
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::config::PageConfig;

/// Pending logout target, alive between a link click and confirm/cancel
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LogoutState {
    pending: Option<String>,
}

impl LogoutState {
    /// Remember a target; a later click replaces an earlier one
    pub fn open(&mut self, href: Option<String>) {
        self.pending = href;
    }

    pub fn close(&mut self) {
        self.pending = None;
    }

    /// Target to navigate to, if any
    pub fn confirm(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

/// Only plain clicks are intercepted so "open in new tab" keeps working
pub fn should_intercept(kind: ClickKind) -> bool {
    kind == ClickKind::Plain
}

/// Keys that dismiss the overlay
pub fn closes_on_key(key: &str) -> bool {
    key == "Escape"
}

/// A click dismisses the overlay only when it lands on the overlay itself,
/// not on its content box or anything inside it
pub fn is_background_click<T: PartialEq + ?Sized>(target: Option<&T>, overlay: &T) -> bool {
    target == Some(overlay)
}

struct LogoutModal {
    element: Element,
    open_class: String,
    state: RefCell<LogoutState>,
}

impl LogoutModal {
    fn show(&self, href: Option<String>) {
        self.state.borrow_mut().open(href);
        let _ = self.element.class_list().add_1(&self.open_class);
        let _ = self.element.set_attribute("aria-hidden", "false");
    }

    fn hide(&self) {
        self.state.borrow_mut().close();
        let _ = self.element.class_list().remove_1(&self.open_class);
        let _ = self.element.set_attribute("aria-hidden", "true");
    }

    fn confirm(&self) {
        let Some(href) = self.state.borrow().confirm().map(str::to_owned) else {
            return;
        };
        log::info!("[Logout] Confirmed, navigating to {}", href);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(&href) {
                log::error!("[Logout] Navigation failed: {:?}", e);
            }
        }
    }

    fn is_background(&self, target: Option<JsValue>) -> bool {
        let overlay: &JsValue = self.element.as_ref();
        is_background_click(target.as_ref(), overlay)
    }
}

/// Wire logout links to the confirmation overlay
///
/// Without the overlay in the page, logout links behave normally.
pub fn wire(config: Rc<PageConfig>) {
    let Some(doc) = dom_wiring::document() else {
        return;
    };
    let Some(element) = doc.get_element_by_id(&config.logout_modal_id) else {
        log::debug!("[Logout] No #{} on this page", config.logout_modal_id);
        return;
    };
    let modal = Rc::new(LogoutModal {
        element,
        open_class: config.logout_open_class.clone(),
        state: RefCell::new(LogoutState::default()),
    });

    for link in dom_wiring::query_all(&doc, &config.logout_link_selector) {
        let modal = modal.clone();
        let href_source = link.clone();
        dom_wiring::bind_click(&link, move |ev| {
            if !should_intercept(ClickModifiers::from_event(&ev).kind()) {
                return;
            }
            ev.prevent_default();
            modal.show(href_source.get_attribute("href"));
        });
    }

    if let Some(cancel) = dom_wiring::query_in(&modal.element, &config.logout_cancel_selector) {
        let modal = modal.clone();
        dom_wiring::bind_click(&cancel, move |_| modal.hide());
    }

    if let Some(confirm) = dom_wiring::query_in(&modal.element, &config.logout_confirm_selector) {
        let modal = modal.clone();
        dom_wiring::bind_click(&confirm, move |_| modal.confirm());
    }

    {
        let modal = modal.clone();
        dom_wiring::bind_keydown(&doc, move |ev| {
            if closes_on_key(&ev.key()) {
                modal.hide();
            }
        });
    }

    let overlay = modal.element.clone();
    dom_wiring::bind_click(&overlay, move |ev| {
        if modal.is_background(ev.target().map(JsValue::from)) {
            modal.hide();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_plain_clicks_are_intercepted() {
        assert!(should_intercept(ClickKind::Plain));
        assert!(!should_intercept(ClickKind::Modified));
        assert!(!should_intercept(ClickKind::Middle));
    }

    #[test]
    fn test_confirm_returns_captured_href() {
        let mut state = LogoutState::default();
        state.open(Some("/logout/".to_string()));
        assert_eq!(state.confirm(), Some("/logout/"));
    }

    #[test]
    fn test_last_click_wins() {
        let mut state = LogoutState::default();
        state.open(Some("/logout/?next=/a".to_string()));
        state.open(Some("/logout/?next=/b".to_string()));
        assert_eq!(state.confirm(), Some("/logout/?next=/b"));
    }

    #[test]
    fn test_close_discards_target() {
        let mut state = LogoutState::default();
        state.open(Some("/logout/".to_string()));
        state.close();
        assert_eq!(state.confirm(), None);
    }

    #[test]
    fn test_escape_closes() {
        assert!(closes_on_key("Escape"));
        assert!(!closes_on_key("Enter"));
        assert!(!closes_on_key("Esc"));
        assert!(!closes_on_key("escape"));
    }

    #[test]
    fn test_background_click_closes_but_content_click_does_not() {
        let overlay = "logoutModal";
        let content_box = "logout-modal-box";
        let confirm_button = "logout-confirm";
        assert!(is_background_click(Some(&overlay), &overlay));
        assert!(!is_background_click(Some(&content_box), &overlay));
        assert!(!is_background_click(Some(&confirm_button), &overlay));
        assert!(!is_background_click(None, &overlay));
    }

    #[test]
    fn test_confirm_without_target_does_nothing() {
        let mut state = LogoutState::default();
        assert_eq!(state.confirm(), None);
        state.open(None);
        assert_eq!(state.confirm(), None);
    }
}
