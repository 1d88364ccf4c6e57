//! Wires DOM events on the marketplace page to the active filter session.

use std::rc::Rc;

use shipsfrom_engine::{ClickDecision, HostDocument, COUNTRY_SELECT};
use shipsfrom_logging::filter_debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MutationObserver, MutationObserverInit};

use super::document::{link_from, HANDLED_ATTR};
use super::ContentScript;

fn listen(target: &Element, event_name: &str, handler: impl FnMut(Event) + 'static) {
    let handler = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event_name, handler.as_ref().unchecked_ref())
        .is_ok()
    {
        handler.forget();
    }
}

/// Hooks the injected country select and the host's items-per-page control.
pub(crate) fn attach_control_listeners(script: &Rc<ContentScript>) {
    if let Some(select) = script.host.first(COUNTRY_SELECT) {
        let handler_script = Rc::clone(script);
        listen(&select, "change", move |_event| {
            let country = handler_script
                .host
                .value_of(COUNTRY_SELECT)
                .unwrap_or_default();
            handler_script
                .slot
                .with_session(|session| session.select_country(&handler_script.host, &country));
        });
    }

    let limit_selector = &script.controller.config().selectors.items_per_page;
    if let Some(limit) = script.host.first(limit_selector) {
        // The control outlives activations on client-side navigation.
        if limit.has_attribute(HANDLED_ATTR) || limit.set_attribute(HANDLED_ATTR, "true").is_err() {
            return;
        }
        let handler_script = Rc::clone(script);
        listen(&limit, "change", move |_event| {
            handler_script
                .slot
                .with_session(|session| session.page_size_changed(&handler_script.host));
        });
    }
}

/// Gives every not-yet-claimed pagination link a click interceptor.
pub(crate) fn claim_pagination_links(script: &Rc<ContentScript>) {
    let claimed = script.controller.claim_pagination_links(&script.host);
    if claimed.is_empty() {
        return;
    }
    filter_debug!("intercepting {} pagination links", claimed.len());

    let elements = script
        .host
        .elements(&script.controller.config().selectors.pagination_links);
    for link in claimed {
        let Some(element) = elements.get(link.index).cloned() else {
            continue;
        };
        let index = link.index;
        let handler_script = Rc::clone(script);
        let target = element.clone();
        listen(&element, "click", move |event| {
            // Read text and href at click time; rendering retargets the href.
            let link = link_from(index, &target);
            let decision = handler_script
                .slot
                .with_session(|session| session.page_link_clicked(&handler_script.host, &link));
            if decision == Some(ClickDecision::Intercept) {
                event.prevent_default();
            }
        });
    }
}

/// Re-scans for pagination links whenever the host page changes its markup.
pub(crate) fn observe_pagination(script: &Rc<ContentScript>) -> Result<(), JsValue> {
    let handler_script = Rc::clone(script);
    let callback = Closure::wrap(Box::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            claim_pagination_links(&handler_script);
        },
    ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    let root = script
        .host
        .document()
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))?;
    observer.observe_with_options(&root, &options)?;
    callback.forget();
    Ok(())
}
