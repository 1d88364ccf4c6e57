use futures_util::future::join_all;
use scraper::Html;
use shipsfrom_core::{total_pages, Dataset, Item};
use shipsfrom_logging::{current_activation, filter_debug, filter_info, filter_warn, set_activation};
use url::Url;

use crate::config::FilterConfig;
use crate::decode::decode_page;
use crate::fetch::Fetcher;
use crate::parse::ListingParser;
use crate::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationStatus {
    Complete {
        total_items: u64,
        total_pages: u32,
        /// Pages whose fetch failed. Only the page covering the current rows is backfilled, from those rows.
        failed_pages: Vec<u32>,
    },
    /// The page states no readable total, so only its own rows were collected.
    TotalUnknown,
    /// The location cannot serve as a base for page URLs.
    InvalidLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub dataset: Dataset,
    pub status: AggregationStatus,
}

/// Collects every listing of a search by fetching all result pages at the largest page size.
pub struct Aggregator<'a, F: Fetcher + ?Sized> {
    parser: &'a ListingParser,
    fetcher: &'a F,
    config: &'a FilterConfig,
}

impl<'a, F: Fetcher + ?Sized> Aggregator<'a, F> {
    pub fn new(parser: &'a ListingParser, fetcher: &'a F, config: &'a FilterConfig) -> Self {
        Self {
            parser,
            fetcher,
            config,
        }
    }

    /// Never fails: a page that cannot be fetched is logged and left out.
    pub async fn aggregate(&self, document_html: &str, location: &str) -> Aggregation {
        let (local_items, total_items) = {
            let document = Html::parse_document(document_html);
            (
                self.parser.items_in(&document),
                self.parser.pagination_total(&document),
            )
        };

        let Some(total_items) = total_items else {
            filter_warn!(
                "pagination total unreadable; filtering the {} listings on this page only",
                local_items.len()
            );
            return Aggregation {
                dataset: Dataset::new(local_items),
                status: AggregationStatus::TotalUnknown,
            };
        };

        let Ok(listing) = Url::parse(location) else {
            filter_warn!("location {location:?} is not a valid URL; filtering this page only");
            return Aggregation {
                dataset: Dataset::new(local_items),
                status: AggregationStatus::InvalidLocation,
            };
        };

        let query = &self.config.query;
        let max_page_size = self.config.max_page_size;
        let stated_pages = total_pages(total_items, max_page_size);
        let page_count = stated_pages.min(self.config.max_pages);
        if page_count < stated_pages {
            filter_warn!(
                "{total_items} listings need {stated_pages} pages; fetching the first {page_count} only"
            );
        }

        let current_page = query.current_page(location);
        let host_page_size = query
            .page_size(location)
            .unwrap_or(self.config.default_items_per_page);
        let covering = covering_page(current_page, host_page_size, max_page_size);
        // The local rows only fill a slot outright when the host already pages at the fetch size.
        let local_slot =
            (host_page_size == max_page_size && covering <= page_count).then_some(covering);

        let remote_pages: Vec<u32> = (1..=page_count)
            .filter(|page| Some(*page) != local_slot)
            .collect();
        filter_info!(
            "aggregating {total_items} listings: {page_count} pages of {max_page_size}, {} to fetch",
            remote_pages.len()
        );

        let activation = current_activation();
        let fetched = join_all(
            remote_pages
                .iter()
                .map(|&page| self.fetch_page(&listing, page)),
        )
        .await;
        set_activation(activation);

        let mut failed_pages = Vec::new();
        let mut fetched = remote_pages.into_iter().zip(fetched);
        let mut local_items = Some(local_items);
        let mut dataset = Dataset::default();
        for page in 1..=page_count {
            if Some(page) == local_slot {
                dataset.extend(local_items.take().unwrap_or_default());
                continue;
            }
            match fetched.next() {
                Some((_, Ok(items))) => dataset.extend(items),
                Some((_, Err(err))) => {
                    filter_warn!("page {page} failed: {err}");
                    failed_pages.push(page);
                    if page == covering {
                        if let Some(local) = local_items.take() {
                            filter_info!(
                                "keeping the {} listings shown on this page in place of page {page}",
                                local.len()
                            );
                            dataset.extend(local);
                        }
                    }
                }
                None => {}
            }
        }

        if page_count == 0 {
            dataset.extend(local_items.take().unwrap_or_default());
        }

        filter_info!(
            "aggregated {} listings from {} countries",
            dataset.len(),
            dataset.unique_countries().len()
        );
        Aggregation {
            dataset,
            status: AggregationStatus::Complete {
                total_items,
                total_pages: page_count,
                failed_pages,
            },
        }
    }

    async fn fetch_page(&self, listing: &Url, page: u32) -> Result<Vec<Item>, FetchError> {
        let url = self
            .config
            .query
            .page_fetch_url(listing, page, self.config.max_page_size);
        let output = self.fetcher.fetch(url.as_str()).await?;
        let html = decode_page(&output.bytes, output.metadata.content_type.as_deref());
        let items = self.parser.parse_items(&html);
        filter_debug!("page {page}: {} listings", items.len());
        Ok(items)
    }
}

/// Fetch page whose range holds row one of host page `current_page`.
fn covering_page(current_page: u32, host_page_size: u32, max_page_size: u32) -> u32 {
    let first_row = u64::from(current_page.saturating_sub(1)) * u64::from(host_page_size);
    let page = first_row / u64::from(max_page_size.max(1)) + 1;
    u32::try_from(page).unwrap_or(u32::MAX)
}
