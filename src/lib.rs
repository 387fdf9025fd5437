//! Event Page UI
//!
//! Browser-side behavior for the server-rendered event pages: interest
//! toggling, logout confirmation and the body-level modal class. The three
//! features share nothing but the page config.

pub mod config;
pub mod cookie;
pub mod interest;
pub mod logout;
pub mod markers;
pub mod modal_observer;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use config::PageConfig;

fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Already set if the module was instantiated twice
    let _ = console_log::init_with_level(level);
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    init_logging();

    dom_wiring::on_dom_ready(|| {
        let Some(doc) = dom_wiring::document() else {
            return;
        };
        let config = Rc::new(PageConfig::from_page(&doc));

        interest::wire(config.clone());
        logout::wire(config.clone());
        modal_observer::start_global(config);
        log::info!("[Page] UI wired");
    });
}
