//! Modal Visibility Observer
//!
//! Keeps one class on `<body>` in step with whether any modal is open, so
//! stylesheets can blur or lock the page without each modal managing it.
//!
//! The class is recomputed on load, after each burst of DOM mutations
//! (debounced), and on a fixed poll for changes the observer cannot see.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MutationObserver, MutationObserverInit};

use crate::config::PageConfig;
use crate::markers;

/// Attributes whose changes can open or close a modal
const WATCHED_ATTRIBUTES: &[&str] = &["class", "style", "aria-hidden"];

thread_local! {
    /// The page's running observer; set by `install`, taken on teardown
    static ACTIVE: RefCell<Option<ModalObserver>> = const { RefCell::new(None) };
}

/// Scan the document for open modals
pub fn any_modal_open(doc: &Document) -> bool {
    let candidates = dom_wiring::query_all(doc, &markers::candidate_selector());
    markers::any_modal_open(&candidates)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassChange {
    Add,
    Remove,
}

/// Change needed to make the body class match `open`
///
/// Rewriting an unchanged class still queues a mutation record, so nothing
/// is written when the class already matches.
pub fn body_class_change(has_class: bool, open: bool) -> Option<ClassChange> {
    match (has_class, open) {
        (false, true) => Some(ClassChange::Add),
        (true, false) => Some(ClassChange::Remove),
        _ => None,
    }
}

/// Add or remove `class` on `<body>`; returns whether a modal is open
pub fn sync_body_class(doc: &Document, class: &str) -> bool {
    let open = any_modal_open(doc);
    if let Some(body) = doc.body() {
        let classes = body.class_list();
        let _ = match body_class_change(classes.contains(class), open) {
            Some(ClassChange::Add) => classes.add_1(class),
            Some(ClassChange::Remove) => classes.remove_1(class),
            None => Ok(()),
        };
    }
    open
}

/// Pending recomputation after a mutation burst
///
/// Armed on every mutation (replacing, and so cancelling, the previous
/// timer), cleared when it fires or on teardown.
#[derive(Default)]
struct Debounce {
    pending: Option<Timeout>,
}

pub struct ModalObserver {
    observer: MutationObserver,
    debounce: Rc<RefCell<Debounce>>,
    poll: Interval,
    _on_mutation: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl ModalObserver {
    pub fn start(config: &PageConfig) -> Result<Self, String> {
        let doc = dom_wiring::document().ok_or("no document")?;
        let class = config.body_modal_class.clone();

        // A cached page can come back with the class still set
        if let Some(body) = doc.body() {
            let _ = body.class_list().remove_1(&class);
        }
        let open = sync_body_class(&doc, &class);
        log::debug!("[ModalObserver] Initial state: open={}", open);

        let debounce = Rc::new(RefCell::new(Debounce::default()));
        let on_mutation = {
            let debounce = debounce.clone();
            let doc = doc.clone();
            let class = class.clone();
            let delay = config.debounce_ms;
            Closure::<dyn FnMut(Array, MutationObserver)>::new(move |_records: Array, _obs: MutationObserver| {
                let fired = debounce.clone();
                let doc = doc.clone();
                let class = class.clone();
                let timeout = Timeout::new(delay, move || {
                    sync_body_class(&doc, &class);
                    fired.borrow_mut().pending.take();
                });
                debounce.borrow_mut().pending = Some(timeout);
            })
        };

        let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to create MutationObserver: {:?}", e))?;
        let filter: Array = WATCHED_ATTRIBUTES.iter().map(|name| JsValue::from_str(name)).collect();
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_attribute_filter(&filter);
        let root: web_sys::Node = match doc.document_element() {
            Some(html) => html.into(),
            None => doc.body().ok_or("no document root")?.into(),
        };
        observer
            .observe_with_options(&root, &init)
            .map_err(|e| format!("Failed to observe document: {:?}", e))?;

        let poll = {
            let doc = doc.clone();
            Interval::new(config.poll_ms, move || {
                sync_body_class(&doc, &class);
            })
        };

        Ok(Self {
            observer,
            debounce,
            poll,
            _on_mutation: on_mutation,
        })
    }

    /// Disconnect the observer and cancel the debounce timer and poll
    pub fn stop(self) {
        self.observer.disconnect();
        self.debounce.borrow_mut().pending.take();
        drop(self.poll);
        log::debug!("[ModalObserver] Stopped");
    }
}

fn install(config: &PageConfig) {
    let observer = match ModalObserver::start(config) {
        Ok(observer) => observer,
        Err(e) => {
            log::error!("[ModalObserver] {}", e);
            return;
        }
    };
    if let Some(previous) = ACTIVE.with(|slot| slot.borrow_mut().replace(observer)) {
        previous.stop();
    }
}

fn is_running() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}

/// Start the page-wide observer, stopping it on `pagehide`
///
/// A page restored from the back/forward cache gets a fresh observer.
pub fn start_global(config: Rc<PageConfig>) {
    install(&config);

    let Some(window) = web_sys::window() else {
        return;
    };
    dom_wiring::bind_event(&window, "pagehide", stop_global);
    dom_wiring::bind_event(&window, "pageshow", move || {
        if !is_running() {
            install(&config);
        }
    });
}

/// Tear down the running observer, if any
pub fn stop_global() {
    if let Some(observer) = ACTIVE.with(|slot| slot.borrow_mut().take()) {
        observer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_added_when_modal_opens() {
        assert_eq!(body_class_change(false, true), Some(ClassChange::Add));
    }

    #[test]
    fn test_class_removed_when_modal_closes() {
        assert_eq!(body_class_change(true, false), Some(ClassChange::Remove));
    }

    #[test]
    fn test_matching_class_is_not_rewritten() {
        assert_eq!(body_class_change(true, true), None);
        assert_eq!(body_class_change(false, false), None);
    }
}
