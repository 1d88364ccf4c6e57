mod document;
mod events;
mod fetch;
mod timer;

use std::rc::Rc;

use log::LevelFilter;
use shipsfrom_engine::{
    Activation, FilterConfig, HostDocument, LifecycleController, NavigationWatcher, SessionSlot,
    FILTER_CONTROL,
};
use shipsfrom_logging::{filter_error, filter_info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use document::BrowserDocument;
use fetch::BrowserFetcher;
use timer::GlooTimer;

/// Everything the content script keeps alive for the lifetime of the tab.
pub(crate) struct ContentScript {
    host: BrowserDocument,
    controller: LifecycleController<BrowserFetcher, GlooTimer>,
    slot: SessionSlot,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    shipsfrom_logging::console::initialize(LevelFilter::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = FilterConfig::default();
    let fetcher = BrowserFetcher::new(config.fetch.clone());
    let controller = LifecycleController::new(config, fetcher, GlooTimer)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let script = Rc::new(ContentScript {
        host: BrowserDocument::new(window, document),
        controller,
        slot: SessionSlot::new(),
    });

    events::observe_pagination(&script)?;
    spawn_activation(&script);
    spawn_local(watch_navigation(script));
    Ok(())
}

fn spawn_activation(script: &Rc<ContentScript>) {
    let generation = script.slot.begin();
    let script = Rc::clone(script);
    spawn_local(async move {
        match script.controller.activate(&script.host, &script.slot, generation).await {
            Ok(Activation::Ready { session, status }) => {
                filter_info!("filter ready: {status:?}");
                if script.slot.install(generation, session) {
                    events::attach_control_listeners(&script);
                    events::claim_pagination_links(&script);
                }
            }
            Ok(Activation::AlreadyActive | Activation::Superseded) => {}
            Err(err) => filter_error!("activation failed: {err}"),
        }
    });
}

async fn watch_navigation(script: Rc<ContentScript>) {
    let mut watcher = NavigationWatcher::new(
        script.controller.config().query.clone(),
        &script.host.location(),
    );
    loop {
        script
            .controller
            .wait_for_navigation(&script.host, &mut watcher)
            .await;
        // The control lists the previous listing's countries.
        script.host.remove_all(FILTER_CONTROL);
        spawn_activation(&script);
    }
}
