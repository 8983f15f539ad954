//! Platform loads for each resource kind, and the timer.

use std::time::Duration;

use futures::future::{self, LocalBoxFuture};
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlImageElement, HtmlLinkElement};

use super::js_reason;
use crate::loader::resource::{LoadError, LoadFuture, ResourceFetcher, Sleeper};

/// Loads through the DOM: `<link>` tags, image decode and `fetch`.
#[derive(Debug, Default)]
pub struct BrowserFetcher;

impl BrowserFetcher {
    fn document(url: &str) -> Result<Document, LoadError> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| LoadError::Unsupported { url: url.to_owned() })
    }

    /// Append a `<link>` to `<head>` and wait for its load or error event.
    fn link(url: &str, rel: &str, as_kind: Option<&str>) -> LoadFuture {
        let owned = url.to_owned();
        let settled = Self::document(url).and_then(|document| {
            Self::append_link(&document, url, rel, as_kind).map_err(|err| failed(url, &err))
        });
        match settled {
            Ok(promise) => Box::pin(async move {
                JsFuture::from(promise).await.map(drop).map_err(|err| failed(&owned, &err))
            }),
            Err(err) => Box::pin(future::ready(Err(err))),
        }
    }

    fn append_link(document: &Document, url: &str, rel: &str, as_kind: Option<&str>) -> Result<Promise, JsValue> {
        let link: HtmlLinkElement = document.create_element("link")?.dyn_into()?;
        link.set_rel(rel);
        if let Some(kind) = as_kind {
            link.set_as(kind);
        }
        let promise = Promise::new(&mut |resolve, reject| {
            link.set_onload(Some(&resolve));
            link.set_onerror(Some(&reject));
        });
        link.set_href(url);
        let head = document.head().ok_or_else(|| JsValue::from_str("document has no <head>"))?;
        head.append_child(&link)?;
        Ok(promise)
    }
}

fn failed(url: &str, err: &JsValue) -> LoadError {
    LoadError::Failed { url: url.to_owned(), reason: js_reason(err) }
}

impl ResourceFetcher for BrowserFetcher {
    fn load_stylesheet(&self, url: &str) -> LoadFuture {
        Self::link(url, "stylesheet", None)
    }

    fn preload_script(&self, url: &str) -> LoadFuture {
        Self::link(url, "preload", Some("script"))
    }

    fn decode_image(&self, url: &str) -> LoadFuture {
        let url = url.to_owned();
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => return Box::pin(future::ready(Err(failed(&url, &err)))),
        };
        image.set_src(&url);
        Box::pin(async move { JsFuture::from(image.decode()).await.map(drop).map_err(|err| failed(&url, &err)) })
    }

    fn fetch(&self, url: &str) -> LoadFuture {
        let url = url.to_owned();
        Box::pin(async move {
            let response = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|err| LoadError::Failed { url: url.clone(), reason: err.to_string() })?;
            let status = response.status();
            if (200..300).contains(&status) {
                Ok(())
            } else {
                Err(LoadError::Failed { url, reason: format!("HTTP {status}") })
            }
        })
    }
}

/// Timer backed by `setTimeout`.
#[derive(Debug, Default)]
pub struct GlooSleeper;

impl Sleeper for GlooSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }
}
