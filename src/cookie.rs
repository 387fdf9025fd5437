//! Cookie Lookup

use percent_encoding::percent_decode_str;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

/// Find `name` in a `document.cookie` style string and URL-decode its value
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .and_then(|raw| percent_decode_str(raw).decode_utf8().ok())
        .map(|value| value.into_owned())
}

/// Read a cookie from the current document
pub fn document_cookie(name: &str) -> Option<String> {
    let doc = dom_wiring::document()?.dyn_into::<HtmlDocument>().ok()?;
    let cookies = doc.cookie().ok()?;
    read_cookie(&cookies, name)
}
