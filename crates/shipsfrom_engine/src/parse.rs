use scraper::{ElementRef, Html, Selector};
use shipsfrom_core::{parse_total_items, Item, RowPayload};
use shipsfrom_logging::filter_trace;

use crate::config::{compile_selector, ConfigError, ListingSelectors};

/// Extracts listings and their shipping country from marketplace result pages.
#[derive(Debug, Clone)]
pub struct ListingParser {
    rows: Selector,
    seller_info: Selector,
    line_item: Selector,
    pagination_total: Selector,
    label: String,
}

impl ListingParser {
    pub fn new(selectors: &ListingSelectors) -> Result<Self, ConfigError> {
        Ok(Self {
            rows: compile_selector(&selectors.rows)?,
            seller_info: compile_selector(&selectors.seller_info)?,
            line_item: compile_selector(&selectors.line_item)?,
            pagination_total: compile_selector(&selectors.pagination_total)?,
            label: selectors.ships_from_label.clone(),
        })
    }

    pub fn parse_items(&self, html: &str) -> Vec<Item> {
        self.items_in(&Html::parse_document(html))
    }

    /// Listing rows in document order; rows without a ships-from line are left out.
    pub fn items_in(&self, document: &Html) -> Vec<Item> {
        let mut skipped = 0usize;
        let items: Vec<Item> = document
            .select(&self.rows)
            .filter_map(|row| {
                let item = self
                    .ships_from(row)
                    .and_then(|country| Item::new(&country, RowPayload::new(row.html())));
                if item.is_none() {
                    skipped += 1;
                }
                item
            })
            .collect();
        if skipped > 0 {
            filter_trace!("skipped {skipped} rows without a ships-from line");
        }
        items
    }

    /// Total listing count stated by the first pagination summary.
    pub fn pagination_total(&self, document: &Html) -> Option<u64> {
        let summary = document.select(&self.pagination_total).next()?;
        parse_total_items(&summary.text().collect::<String>())
    }

    fn ships_from(&self, row: ElementRef) -> Option<String> {
        let seller_info = row.select(&self.seller_info).next()?;
        seller_info
            .select(&self.line_item)
            .map(|line| line.text().collect::<String>())
            .find(|text| text.contains(&self.label))
            .map(|text| text.replace(&self.label, "").trim().to_string())
    }
}
