//! Modal Markers
//!
//! Declarative table of the classes and attributes that identify modal-like
//! elements and their open state. Only these explicit markers count; computed
//! style is never consulted.

use web_sys::Element;

/// A class or attribute marker found on an element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Class(&'static str),
    Attr(&'static str, &'static str),
}

/// What a marker says about the element carrying it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meaning {
    /// Full-screen overlay wrapper
    Overlay,
    /// Element with an explicit dialog role
    Dialog,
    /// Open state class
    Open,
    /// ARIA state meaning "shown"
    Visible,
}

pub const MODAL_MARKERS: &[(Marker, Meaning)] = &[
    (Marker::Class("modal-overlay"), Meaning::Overlay),
    (Marker::Class("logout-modal-overlay"), Meaning::Overlay),
    (Marker::Attr("role", "dialog"), Meaning::Dialog),
    (Marker::Class("open"), Meaning::Open),
    (Marker::Class("logout-open"), Meaning::Open),
    (Marker::Attr("aria-hidden", "false"), Meaning::Visible),
];

/// Read access to the parts of an element the markers look at
pub trait MarkedElement {
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
}

impl MarkedElement for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }
}

impl Marker {
    pub fn matches<E: MarkedElement + ?Sized>(&self, el: &E) -> bool {
        match *self {
            Marker::Class(class) => el.has_class(class),
            Marker::Attr(name, value) => el.attribute(name).as_deref() == Some(value),
        }
    }

    pub fn selector(&self) -> String {
        match *self {
            Marker::Class(class) => format!(".{}", class),
            Marker::Attr(name, value) => format!("[{}=\"{}\"]", name, value),
        }
    }
}

fn markers_for(meaning: Meaning) -> impl Iterator<Item = Marker> {
    MODAL_MARKERS
        .iter()
        .filter(move |(_, m)| *m == meaning)
        .map(|(marker, _)| *marker)
}

fn has_meaning<E: MarkedElement + ?Sized>(el: &E, meaning: Meaning) -> bool {
    markers_for(meaning).any(|marker| marker.matches(el))
}

/// Ways a modal can announce that it is open
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Overlay wrapper carrying an open class
    Overlay,
    /// `role="dialog"` shown via `aria-hidden="false"` or an open class
    AriaDialog,
}

pub const STRATEGIES: &[Strategy] = &[Strategy::Overlay, Strategy::AriaDialog];

impl Strategy {
    fn container(&self) -> Meaning {
        match self {
            Strategy::Overlay => Meaning::Overlay,
            Strategy::AriaDialog => Meaning::Dialog,
        }
    }

    /// Selector matching every element this strategy has to inspect
    pub fn container_selector(&self) -> String {
        markers_for(self.container())
            .map(|marker| marker.selector())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_open<E: MarkedElement + ?Sized>(&self, el: &E) -> bool {
        if !has_meaning(el, self.container()) {
            return false;
        }
        match self {
            Strategy::Overlay => has_meaning(el, Meaning::Open),
            Strategy::AriaDialog => has_meaning(el, Meaning::Visible) || has_meaning(el, Meaning::Open),
        }
    }
}

/// Selector covering the containers of all strategies
pub fn candidate_selector() -> String {
    STRATEGIES
        .iter()
        .map(Strategy::container_selector)
        .collect::<Vec<_>>()
        .join(", ")
}

/// True if any element is an open modal under any strategy
pub fn any_modal_open<'a, E, I>(elements: I) -> bool
where
    E: MarkedElement + 'a,
    I: IntoIterator<Item = &'a E>,
{
    elements
        .into_iter()
        .any(|el| STRATEGIES.iter().any(|strategy| strategy.is_open(el)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic element for exercising the table without a document
    #[derive(Default)]
    struct Fragment {
        classes: Vec<&'static str>,
        attrs: Vec<(&'static str, &'static str)>,
    }

    impl Fragment {
        fn class(mut self, class: &'static str) -> Self {
            self.classes.push(class);
            self
        }

        fn attr(mut self, name: &'static str, value: &'static str) -> Self {
            self.attrs.push((name, value));
            self
        }
    }

    impl MarkedElement for Fragment {
        fn has_class(&self, class: &str) -> bool {
            self.classes.iter().any(|c| *c == class)
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.to_string())
        }
    }

    fn dialog() -> Fragment {
        Fragment::default().attr("role", "dialog")
    }

    #[test]
    fn test_overlay_needs_open_class() {
        let closed = Fragment::default().class("modal-overlay");
        let open = Fragment::default().class("modal-overlay").class("open");
        let logout = Fragment::default().class("logout-modal-overlay").class("logout-open");
        assert!(!Strategy::Overlay.is_open(&closed));
        assert!(Strategy::Overlay.is_open(&open));
        assert!(Strategy::Overlay.is_open(&logout));
    }

    #[test]
    fn test_overlay_ignores_aria_hidden() {
        let el = Fragment::default().class("modal-overlay").attr("aria-hidden", "false");
        assert!(!Strategy::Overlay.is_open(&el));
    }

    #[test]
    fn test_open_class_without_container_is_not_a_modal() {
        let menu = Fragment::default().class("dropdown").class("open");
        assert!(!Strategy::Overlay.is_open(&menu));
        assert!(!Strategy::AriaDialog.is_open(&menu));
    }

    #[test]
    fn test_dialog_visibility() {
        assert!(Strategy::AriaDialog.is_open(&dialog().attr("aria-hidden", "false")));
        assert!(!Strategy::AriaDialog.is_open(&dialog().attr("aria-hidden", "true")));
        assert!(!Strategy::AriaDialog.is_open(&dialog()));
        assert!(Strategy::AriaDialog.is_open(&dialog().class("open")));
        assert!(Strategy::AriaDialog.is_open(&dialog().attr("aria-hidden", "true").class("logout-open")));
    }

    #[test]
    fn test_any_modal_open_combines_strategies() {
        let page = vec![
            Fragment::default().class("modal-overlay"),
            dialog().attr("aria-hidden", "true"),
        ];
        assert!(!any_modal_open(&page));

        let page = vec![
            Fragment::default().class("modal-overlay"),
            dialog().attr("aria-hidden", "false"),
        ];
        assert!(any_modal_open(&page));

        let empty: Vec<Fragment> = Vec::new();
        assert!(!any_modal_open(&empty));
    }

    #[test]
    fn test_selectors() {
        assert_eq!(Strategy::Overlay.container_selector(), ".modal-overlay, .logout-modal-overlay");
        assert_eq!(Strategy::AriaDialog.container_selector(), "[role=\"dialog\"]");
        assert_eq!(candidate_selector(), ".modal-overlay, .logout-modal-overlay, [role=\"dialog\"]");
    }
}
