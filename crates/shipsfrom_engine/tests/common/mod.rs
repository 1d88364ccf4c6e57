#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

use scraper::{Html, Selector};
use shipsfrom_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, HostDocument, HostLink,
    ListingSelectors, Timer,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shipsfrom_logging::initialize_for_tests);
}

pub const LISTING_URL: &str = "https://shop.test/sell/list?q=dune&limit=25&page=1";

pub fn row_markup(id: usize, country: &str) -> String {
    format!(
        "<tr data-id=\"{id}\"><td class=\"item_description\">Item {id}</td>\
         <td><ul class=\"seller_info\"><li>Seller: shop{id}</li>\
         <li><span class=\"mplabel\">Ships From:</span> {country}</li></ul></td></tr>"
    )
}

/// Marketplace result page with the given countries as rows, ids starting at `first_id`.
pub fn listing_page(first_id: usize, countries: &[&str], total: Option<u64>) -> String {
    let rows: String = countries
        .iter()
        .enumerate()
        .map(|(offset, country)| row_markup(first_id + offset, country))
        .collect();
    let summary = match total {
        Some(total) => format!("1 - {} of {total}", countries.len()),
        None => "Results".to_string(),
    };
    let links = "<a href=\"/sell/list?q=dune&amp;page=1\">« Prev</a>\
                 <a href=\"/sell/list?q=dune&amp;page=1\">1</a>\
                 <a href=\"/sell/list?q=dune&amp;page=2\">2</a>\
                 <a href=\"/sell/list?q=dune&amp;page=3\">3</a>\
                 <a href=\"/sell/list?q=dune&amp;page=2\">Next »</a>";
    format!(
        "<html><body>\
         <div class=\"marketplace_filters_container\"></div>\
         <div class=\"pagination top\"><strong class=\"pagination_total\">{summary}</strong>{links}</div>\
         <select name=\"limit\"><option value=\"25\" selected>25</option><option value=\"250\">250</option></select>\
         <table class=\"table_block mpitems\"><tbody>{rows}</tbody></table>\
         <div class=\"pagination bottom\"><strong class=\"pagination_total\">{summary}</strong>{links}</div>\
         </body></html>"
    )
}

/// In-memory stand-in for the browser page.
///
/// The initial markup is static; every mutation is recorded on the side so
/// tests can inspect exactly what the filter changed.
pub struct MemoryDocument {
    html: String,
    location: RefCell<String>,
    history: RefCell<Vec<String>>,
    fragments: RefCell<Vec<(String, String)>>,
    children: RefCell<HashMap<String, Vec<String>>>,
    texts: RefCell<HashMap<String, String>>,
    values: RefCell<HashMap<String, String>>,
    links: RefCell<Vec<HostLink>>,
    link_selector: String,
}

impl MemoryDocument {
    pub fn new(html: &str, location: &str) -> Self {
        let selectors = ListingSelectors::default();
        let document = Html::parse_document(html);
        let links = document
            .select(&selector(&selectors.pagination_links))
            .enumerate()
            .map(|(index, link)| HostLink {
                index,
                text: link.text().collect::<String>().trim().to_string(),
                href: link.value().attr("href").map(str::to_string),
                handled: false,
            })
            .collect();
        let values = HashMap::from([(selectors.items_per_page.clone(), "25".to_string())]);
        Self {
            html: html.to_string(),
            location: RefCell::new(location.to_string()),
            history: RefCell::new(Vec::new()),
            fragments: RefCell::new(Vec::new()),
            children: RefCell::new(HashMap::new()),
            texts: RefCell::new(HashMap::new()),
            values: RefCell::new(values),
            links: RefCell::new(links),
            link_selector: selectors.pagination_links,
        }
    }

    pub fn blank(location: &str) -> Self {
        Self::new("<html><body></body></html>", location)
    }

    /// Address change made by the host itself, not through history replace.
    pub fn navigate(&self, location: &str) {
        *self.location.borrow_mut() = location.to_string();
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn children_of(&self, selector: &str) -> Option<Vec<String>> {
        self.children.borrow().get(selector).cloned()
    }

    pub fn text_of(&self, selector: &str) -> Option<String> {
        self.texts.borrow().get(selector).cloned()
    }

    pub fn link(&self, index: usize) -> HostLink {
        self.links.borrow()[index].clone()
    }

    pub fn fragment_count(&self, selector: &str) -> usize {
        let selector = self::selector(selector);
        self.fragments
            .borrow()
            .iter()
            .filter(|(_, markup)| fragment_matches(markup, &selector))
            .count()
    }

    pub fn fragments(&self) -> Vec<(String, String)> {
        self.fragments.borrow().clone()
    }

    fn in_document(&self, selector: &str) -> usize {
        Html::parse_document(&self.html)
            .select(&self::selector(selector))
            .count()
    }
}

impl HostDocument for MemoryDocument {
    fn location(&self) -> String {
        self.location.borrow().clone()
    }

    fn replace_location(&self, url: &str) {
        *self.location.borrow_mut() = url.to_string();
        self.history.borrow_mut().push(url.to_string());
    }

    fn snapshot_html(&self) -> String {
        self.html.clone()
    }

    fn exists(&self, selector: &str) -> bool {
        self.in_document(selector) > 0 || self.fragment_count(selector) > 0
    }

    fn value_of(&self, selector: &str) -> Option<String> {
        self.values.borrow().get(selector).cloned()
    }

    fn set_value(&self, selector: &str, value: &str) -> bool {
        if !self.exists(selector) {
            return false;
        }
        self.values
            .borrow_mut()
            .insert(selector.to_string(), value.to_string());
        true
    }

    fn replace_children(&self, selector: &str, markup: &[&str]) -> bool {
        if self.in_document(selector) == 0 {
            return false;
        }
        self.children.borrow_mut().insert(
            selector.to_string(),
            markup.iter().map(|row| row.to_string()).collect(),
        );
        true
    }

    fn set_text_all(&self, selector: &str, text: &str) -> usize {
        let count = self.in_document(selector);
        if count > 0 {
            self.texts
                .borrow_mut()
                .insert(selector.to_string(), text.to_string());
        }
        count
    }

    fn insert_after(&self, anchor: &str, markup: &str) -> bool {
        if !self.exists(anchor) {
            return false;
        }
        self.fragments
            .borrow_mut()
            .push((anchor.to_string(), markup.to_string()));
        true
    }

    fn remove_all(&self, selector: &str) -> usize {
        let selector = self::selector(selector);
        let mut fragments = self.fragments.borrow_mut();
        let before = fragments.len();
        fragments.retain(|(_, markup)| !fragment_matches(markup, &selector));
        before - fragments.len()
    }

    fn links(&self, selector: &str) -> Vec<HostLink> {
        if selector != self.link_selector {
            return Vec::new();
        }
        self.links.borrow().clone()
    }

    fn set_link_href(&self, _selector: &str, index: usize, href: &str) -> bool {
        match self.links.borrow_mut().get_mut(index) {
            Some(link) => {
                link.href = Some(href.to_string());
                true
            }
            None => false,
        }
    }

    fn mark_link_handled(&self, _selector: &str, index: usize) -> bool {
        match self.links.borrow_mut().get_mut(index) {
            Some(link) => {
                link.handled = true;
                true
            }
            None => false,
        }
    }
}

fn selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

fn fragment_matches(markup: &str, selector: &Selector) -> bool {
    Html::parse_fragment(markup).select(selector).next().is_some()
}

/// Serves pages from memory, keyed by the `page` parameter of the request.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<u32, String>,
    failing: Vec<u32>,
    delay: Option<Duration>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, html: String) -> Self {
        self.pages.insert(page, html);
        self
    }

    pub fn failing(mut self, page: u32) -> Self {
        self.failing.push(page);
        self
    }

    /// Every response takes `delay` of real time, so other tasks get to run meanwhile.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let page = url::Url::parse(url)
            .ok()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "page")
                    .and_then(|(_, value)| value.parse::<u32>().ok())
            })
            .unwrap_or(1);
        if self.failing.contains(&page) {
            return Err(FetchError::new(FailureKind::HttpStatus(500), "server error"));
        }
        let html = self.pages.get(&page).cloned().unwrap_or_default();
        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: html.len() as u64,
            },
            bytes: html.into_bytes(),
        })
    }
}

/// Returns immediately and counts how often it was asked to wait.
#[derive(Default)]
pub struct CountingTimer {
    sleeps: Cell<u32>,
}

impl CountingTimer {
    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }
}

#[async_trait::async_trait(?Send)]
impl Timer for CountingTimer {
    async fn sleep(&self, _duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
    }
}
