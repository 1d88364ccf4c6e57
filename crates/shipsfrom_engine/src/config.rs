use std::time::Duration;

use scraper::Selector;
use serde::Deserialize;
use shipsfrom_core::{QueryParams, DEFAULT_ITEMS_PER_PAGE};

use crate::fetch::FetchSettings;

/// Largest page size the marketplace serves.
pub const MAX_PAGE_SIZE: u32 = 250;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Where the host page keeps the pieces the filter reads and rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub table: String,
    pub table_body: String,
    pub rows: String,
    pub seller_info: String,
    pub line_item: String,
    /// Text that prefixes the shipping country inside a seller line item.
    pub ships_from_label: String,
    pub pagination_total: String,
    pub pagination_links: String,
    pub items_per_page: String,
    /// Candidate anchors for the filter control, in priority order.
    pub insertion_anchors: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            table: ".table_block.mpitems".to_string(),
            table_body: ".table_block.mpitems tbody".to_string(),
            rows: ".table_block.mpitems tbody tr".to_string(),
            seller_info: ".seller_info".to_string(),
            line_item: "li".to_string(),
            ships_from_label: "Ships From:".to_string(),
            pagination_total: ".pagination_total".to_string(),
            pagination_links: ".pagination.top a, .pagination.bottom a".to_string(),
            items_per_page: "select[name=\"limit\"]".to_string(),
            insertion_anchors: vec![
                ".marketplace_filters_container".to_string(),
                ".pagination.top".to_string(),
                ".table_block.mpitems".to_string(),
            ],
        }
    }
}

impl ListingSelectors {
    fn all(&self) -> impl Iterator<Item = &str> {
        [
            &self.table,
            &self.table_body,
            &self.rows,
            &self.seller_info,
            &self.line_item,
            &self.pagination_total,
            &self.pagination_links,
            &self.items_per_page,
        ]
        .into_iter()
        .chain(self.insertion_anchors.iter())
        .map(String::as_str)
    }
}

/// Bounded polling used while waiting for host elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            max_attempts: 30,
        }
    }
}

impl PollPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub selectors: ListingSelectors,
    pub poll: PollPolicy,
    /// How often the address is checked for client-side navigation.
    pub url_poll_interval_ms: u64,
    /// Pause after a navigation before the next activation starts.
    pub settle_delay_ms: u64,
    pub max_page_size: u32,
    /// Upper bound on result pages fetched for one listing.
    pub max_pages: u32,
    pub default_items_per_page: u32,
    pub query: QueryParams,
    pub fetch: FetchSettings,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            selectors: ListingSelectors::default(),
            poll: PollPolicy::default(),
            url_poll_interval_ms: 500,
            settle_delay_ms: 1000,
            max_page_size: MAX_PAGE_SIZE,
            max_pages: 400,
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            query: QueryParams::default(),
            fetch: FetchSettings::default(),
        }
    }
}

impl FilterConfig {
    pub fn url_poll_interval(&self) -> Duration {
        Duration::from_millis(self.url_poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_page_size", self.max_page_size),
            ("max_pages", self.max_pages),
            ("default_items_per_page", self.default_items_per_page),
            ("poll.max_attempts", self.poll.max_attempts),
        ];
        if let Some((field, _)) = positive.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero { field });
        }
        for selector in self.selectors.all() {
            compile_selector(selector)?;
        }
        Ok(())
    }
}

pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|err| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}
