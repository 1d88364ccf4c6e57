use std::fmt;

use crate::{format_thousands, RowPayload};

/// Text shown in every pagination-total element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationSummary {
    /// 1-indexed positions of the visible rows within the filtered set.
    Range {
        start: usize,
        end: usize,
        total: usize,
    },
    /// Nothing matches the filter.
    Empty { country: Option<String> },
    /// The cursor moved past the last filtered page.
    PastEnd { page: u32, total: usize },
}

impl fmt::Display for PaginationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationSummary::Range { start, end, total } => write!(
                f,
                "{} - {} of {}",
                format_thousands(*start as u64),
                format_thousands(*end as u64),
                format_thousands(*total as u64)
            ),
            PaginationSummary::Empty {
                country: Some(country),
            } => write!(f, "No listings ship from {country}"),
            PaginationSummary::Empty { country: None } => write!(f, "No listings"),
            PaginationSummary::PastEnd { page, total } => write!(
                f,
                "No listings on page {} of {}",
                page,
                format_thousands(*total as u64)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub selected_country: String,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_filtered: usize,
    pub total_pages: u32,
    /// Payloads of the visible page, in slice order.
    pub rows: Vec<RowPayload>,
    pub summary: PaginationSummary,
    /// Options for the filter control, sorted.
    pub countries: Vec<String>,
}
