//! Root element classes, head hints, the live region and the loading skeleton.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::js_reason;
use crate::loader::resource::PlaceholderHost;
use crate::prefs::document::DocumentSurface;
use crate::prefs::notify::Notifier;

const LIVE_REGION_ID: &str = "adapt-live-region";
const SKELETON_ID: &str = "adapt-skeleton";
const CONTENT_SELECTOR: &str = "main";

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Writes preference markers to `<html>` and `<meta name="theme-color">`.
#[derive(Debug, Default)]
pub struct BrowserDocument {
    document: Option<Document>,
}

impl BrowserDocument {
    #[must_use]
    pub fn new() -> Self {
        Self { document: document() }
    }

    fn theme_color_meta(document: &Document) -> Result<Element, JsValue> {
        if let Some(meta) = document.query_selector("meta[name=\"theme-color\"]")? {
            return Ok(meta);
        }
        let meta = document.create_element("meta")?;
        meta.set_attribute("name", "theme-color")?;
        if let Some(head) = document.head() {
            head.append_child(&meta)?;
        }
        Ok(meta)
    }
}

impl DocumentSurface for BrowserDocument {
    fn set_class(&self, class: &str, present: bool) {
        let Some(root) = self.document.as_ref().and_then(Document::document_element) else {
            return;
        };
        if let Err(err) = root.class_list().toggle_with_force(class, present) {
            warn!(class, reason = %js_reason(&err), "failed to update root class");
        }
    }

    fn set_theme_color(&self, color: &str) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        let result = Self::theme_color_meta(document).and_then(|meta| meta.set_attribute("content", color));
        if let Err(err) = result {
            warn!(color, reason = %js_reason(&err), "failed to update theme-color hint");
        }
    }
}

/// Announces confirmations through a polite ARIA live region.
#[derive(Debug, Default)]
pub struct LiveRegionNotifier;

impl LiveRegionNotifier {
    fn region(document: &Document) -> Result<Element, JsValue> {
        if let Some(region) = document.get_element_by_id(LIVE_REGION_ID) {
            return Ok(region);
        }
        let region = document.create_element("div")?;
        region.set_id(LIVE_REGION_ID);
        region.set_attribute("role", "status")?;
        region.set_attribute("aria-live", "polite")?;
        region.set_class_name("sr-only");
        if let Some(body) = document.body() {
            body.append_child(&region)?;
        }
        Ok(region)
    }
}

impl Notifier for LiveRegionNotifier {
    fn notify(&self, message: &str) {
        let Some(document) = document() else {
            return;
        };
        match Self::region(&document) {
            Ok(region) => region.set_text_content(Some(message)),
            Err(err) => warn!(reason = %js_reason(&err), "live region unavailable"),
        }
    }
}

/// Shows a skeleton inside `<main>` while it has no rendered content.
#[derive(Debug, Default)]
pub struct BrowserSkeleton;

impl BrowserSkeleton {
    fn inject(document: &Document) -> Result<bool, JsValue> {
        let Some(host) = document.query_selector(CONTENT_SELECTOR)?.or_else(|| document.body().map(Element::from))
        else {
            return Ok(false);
        };
        let skeleton = document.create_element("div")?;
        skeleton.set_id(SKELETON_ID);
        skeleton.set_class_name("adapt-skeleton");
        skeleton.set_attribute("aria-hidden", "true")?;
        host.append_child(&skeleton)?;
        Ok(true)
    }
}

/// Whether a child of the content host is page content rather than
/// plumbing: the wasm loader script, styles, templates, or this layer's
/// own live region and skeleton.
fn counts_as_content(tag_name: &str, id: &str) -> bool {
    let plumbing = matches!(
        tag_name.to_ascii_lowercase().as_str(),
        "script" | "noscript" | "style" | "link" | "template"
    );
    !plumbing && id != LIVE_REGION_ID && id != SKELETON_ID
}

fn has_rendered_children(host: &Element) -> bool {
    let children = host.children();
    (0..children.length())
        .filter_map(|index| children.item(index))
        .any(|child| counts_as_content(&child.tag_name(), &child.id()))
}

impl PlaceholderHost for BrowserSkeleton {
    fn has_content(&self) -> bool {
        let Some(document) = document() else {
            return true;
        };
        match document.query_selector(CONTENT_SELECTOR) {
            Ok(Some(main)) => has_rendered_children(&main),
            Ok(None) => document.body().is_some_and(|body| has_rendered_children(&body)),
            Err(err) => {
                warn!(reason = %js_reason(&err), "content lookup failed; assuming content present");
                true
            }
        }
    }

    fn inject_skeleton(&self) -> bool {
        let Some(document) = document() else {
            return false;
        };
        Self::inject(&document).unwrap_or_else(|err| {
            warn!(reason = %js_reason(&err), "failed to inject skeleton");
            false
        })
    }

    fn remove_skeleton(&self) {
        if let Some(skeleton) = document().and_then(|document| document.get_element_by_id(SKELETON_ID)) {
            skeleton.remove();
        }
    }
}
