//! DOM Wiring Utilities
//!
//! Small helpers for attaching Rust closures to server-rendered markup.
//! Listeners are bound for the lifetime of the page, so their closures are
//! leaked with `forget()` once attached.

use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, KeyboardEvent, MouseEvent};

/// How a click was made, as far as link interception cares
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickKind {
    /// Plain left click (or keyboard activation)
    Plain,
    /// Meta, ctrl or shift held: "open in new tab/window"
    Modified,
    /// Middle button
    Middle,
}

/// Mouse button index reported for the middle button
const MIDDLE_BUTTON: i16 = 1;

/// Modifier state captured from a click
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub button: i16,
}

impl ClickModifiers {
    pub fn from_event(ev: &MouseEvent) -> Self {
        Self {
            meta: ev.meta_key(),
            ctrl: ev.ctrl_key(),
            shift: ev.shift_key(),
            button: ev.button(),
        }
    }

    pub fn kind(&self) -> ClickKind {
        if self.meta || self.ctrl || self.shift {
            ClickKind::Modified
        } else if self.button == MIDDLE_BUTTON {
            ClickKind::Middle
        } else {
            ClickKind::Plain
        }
    }
}

/// Current document, if running in a browser window
pub fn document() -> Option<Document> {
    web_sys::window().and_then(|win| win.document())
}

/// Collect every element matching `selector` under `root`
///
/// An invalid selector yields an empty list.
pub fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element matching `selector` under `parent`
pub fn query_in(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

fn attach<T>(target: &EventTarget, event: &str, cb: Closure<T>)
where
    T: ?Sized + WasmClosure,
{
    let _ = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    cb.forget();
}

/// Bind a click handler for the rest of the page's life
pub fn bind_click(target: &EventTarget, handler: impl FnMut(MouseEvent) + 'static) {
    let cb = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    attach(target, "click", cb);
}

/// Bind a keydown handler for the rest of the page's life
pub fn bind_keydown(target: &EventTarget, handler: impl FnMut(KeyboardEvent) + 'static) {
    let cb = Closure::<dyn FnMut(KeyboardEvent)>::new(handler);
    attach(target, "keydown", cb);
}

/// Bind a handler for any event type that needs no event data
pub fn bind_event(target: &EventTarget, event: &str, handler: impl FnMut() + 'static) {
    let cb = Closure::<dyn FnMut()>::new(handler);
    attach(target, event, cb);
}

/// `document.readyState` value while the parser is still running
const READY_STATE_LOADING: &str = "loading";

pub fn is_loading(ready_state: &str) -> bool {
    ready_state == READY_STATE_LOADING
}

/// Run `f` once the document has been parsed
///
/// Module scripts usually execute after parsing has finished, in which case
/// `f` runs immediately.
pub fn on_dom_ready(f: impl FnOnce() + 'static) {
    let Some(doc) = document() else {
        return;
    };
    if !is_loading(&doc.ready_state()) {
        f();
        return;
    }
    let cb = Closure::once(f);
    let _ = doc.add_event_listener_with_callback("DOMContentLoaded", cb.as_ref().unchecked_ref());
    cb.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(meta: bool, ctrl: bool, shift: bool, button: i16) -> ClickModifiers {
        ClickModifiers { meta, ctrl, shift, button }
    }

    #[test]
    fn test_plain_left_click() {
        assert_eq!(click(false, false, false, 0).kind(), ClickKind::Plain);
    }

    #[test]
    fn test_modifier_keys_win_over_button() {
        assert_eq!(click(true, false, false, 0).kind(), ClickKind::Modified);
        assert_eq!(click(false, true, false, 0).kind(), ClickKind::Modified);
        assert_eq!(click(false, false, true, 0).kind(), ClickKind::Modified);
        assert_eq!(click(false, true, false, 1).kind(), ClickKind::Modified);
    }

    #[test]
    fn test_ready_state() {
        assert!(is_loading("loading"));
        assert!(!is_loading("interactive"));
        assert!(!is_loading("complete"));
    }

    #[test]
    fn test_middle_click() {
        assert_eq!(click(false, false, false, 1).kind(), ClickKind::Middle);
    }
}
