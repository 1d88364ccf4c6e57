use shipsfrom_engine::{HostDocument, HostLink};
use shipsfrom_logging::{filter_debug, filter_warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlSelectElement, Window};

/// Marks links that already carry the click interceptor.
pub(crate) const HANDLED_ATTR: &str = "data-handled-by-filter";

/// The live marketplace page, reached through `web_sys`.
pub(crate) struct BrowserDocument {
    window: Window,
    document: Document,
}

impl BrowserDocument {
    pub(crate) fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn first(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Every element matching `selector`, in document order. An invalid selector matches nothing.
    pub(crate) fn elements(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            filter_debug!("selector `{selector}` rejected by the browser");
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn select(&self, selector: &str) -> Option<HtmlSelectElement> {
        self.first(selector)?.dyn_into::<HtmlSelectElement>().ok()
    }
}

impl HostDocument for BrowserDocument {
    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn replace_location(&self, url: &str) {
        let replaced = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(url)));
        if let Err(err) = replaced {
            filter_warn!("history replace to {url} failed: {err:?}");
        }
    }

    fn snapshot_html(&self) -> String {
        self.document
            .document_element()
            .map(|root| root.outer_html())
            .unwrap_or_default()
    }

    fn exists(&self, selector: &str) -> bool {
        self.first(selector).is_some()
    }

    fn value_of(&self, selector: &str) -> Option<String> {
        self.select(selector).map(|select| select.value())
    }

    fn set_value(&self, selector: &str, value: &str) -> bool {
        match self.select(selector) {
            Some(select) => {
                select.set_value(value);
                true
            }
            None => false,
        }
    }

    fn replace_children(&self, selector: &str, markup: &[&str]) -> bool {
        match self.first(selector) {
            Some(element) => {
                element.set_inner_html(&markup.concat());
                true
            }
            None => false,
        }
    }

    fn set_text_all(&self, selector: &str, text: &str) -> usize {
        let elements = self.elements(selector);
        for element in &elements {
            element.set_text_content(Some(text));
        }
        elements.len()
    }

    fn insert_after(&self, anchor: &str, markup: &str) -> bool {
        self.first(anchor)
            .is_some_and(|element| element.insert_adjacent_html("afterend", markup).is_ok())
    }

    fn remove_all(&self, selector: &str) -> usize {
        let elements = self.elements(selector);
        for element in &elements {
            element.remove();
        }
        elements.len()
    }

    fn links(&self, selector: &str) -> Vec<HostLink> {
        self.elements(selector)
            .iter()
            .enumerate()
            .map(|(index, element)| link_from(index, element))
            .collect()
    }

    fn set_link_href(&self, selector: &str, index: usize, href: &str) -> bool {
        self.elements(selector)
            .get(index)
            .is_some_and(|element| element.set_attribute("href", href).is_ok())
    }

    fn mark_link_handled(&self, selector: &str, index: usize) -> bool {
        self.elements(selector)
            .get(index)
            .is_some_and(|element| element.set_attribute(HANDLED_ATTR, "true").is_ok())
    }
}

pub(crate) fn link_from(index: usize, element: &Element) -> HostLink {
    HostLink {
        index,
        text: element.text_content().unwrap_or_default().trim().to_string(),
        href: element.get_attribute("href"),
        handled: element.has_attribute(HANDLED_ATTR),
    }
}
