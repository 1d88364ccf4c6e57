use crate::view_model::{FilterView, PaginationSummary};
use crate::{total_pages, Dataset, RowPayload};

/// Page size assumed when the host's own control cannot be read.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 25;

/// Whether a country selection came from the user or from a page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectOrigin {
    User,
    Pagination,
}

/// Filter state for one activation: the aggregated dataset plus the cursor into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    dataset: Dataset,
    selected_country: String,
    current_page: u32,
    items_per_page: u32,
    fallback_items_per_page: u32,
    total_filtered: usize,
    dirty: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_default_page_size(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `page_size` items per page, also used whenever the host control is unreadable.
    pub fn with_default_page_size(page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            dataset: Dataset::default(),
            selected_country: String::new(),
            current_page: 1,
            items_per_page: page_size,
            fallback_items_per_page: page_size,
            total_filtered: 0,
            dirty: false,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selected_country(&self) -> &str {
        &self.selected_country
    }

    pub fn is_filter_active(&self) -> bool {
        !self.selected_country.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn total_filtered(&self) -> usize {
        self.total_filtered
    }

    pub fn view(&self) -> FilterView {
        let filtered = self.dataset.filtered(&self.selected_country);
        let per_page = self.items_per_page as usize;
        let start = (self.current_page as usize - 1).saturating_mul(per_page);
        let rows: Vec<RowPayload> = filtered
            .iter()
            .skip(start)
            .take(per_page)
            .map(|item| item.payload().clone())
            .collect();

        let total = filtered.len();
        let summary = if total == 0 {
            PaginationSummary::Empty {
                country: (!self.selected_country.is_empty())
                    .then(|| self.selected_country.clone()),
            }
        } else if rows.is_empty() {
            PaginationSummary::PastEnd {
                page: self.current_page,
                total,
            }
        } else {
            PaginationSummary::Range {
                start: start + 1,
                end: start + rows.len(),
                total,
            }
        };

        FilterView {
            selected_country: self.selected_country.clone(),
            current_page: self.current_page,
            items_per_page: self.items_per_page,
            total_filtered: total,
            total_pages: total_pages(total as u64, self.items_per_page),
            rows,
            summary,
            countries: self.dataset.unique_countries(),
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn install_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.recompute();
    }

    pub(crate) fn select_country(&mut self, country: String, origin: SelectOrigin) {
        self.selected_country = country.trim().to_string();
        if origin == SelectOrigin::User {
            self.current_page = 1;
        }
        self.recompute();
    }

    pub(crate) fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
        self.dirty = true;
    }

    /// Applies the raw value of the host's items-per-page control.
    pub(crate) fn apply_page_size(&mut self, raw: Option<&str>) {
        self.items_per_page = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(self.fallback_items_per_page);
        self.dirty = true;
    }

    pub(crate) fn recompute(&mut self) {
        self.total_filtered = self.dataset.filtered(&self.selected_country).len();
        self.dirty = true;
    }
}
