use std::fmt::Write as _;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use shipsfrom_core::FilterView;
use shipsfrom_engine::{Aggregation, AggregationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CountryCount {
    pub country: String,
    pub listings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FilteredPage {
    pub country: String,
    pub page: u32,
    pub total_pages: u32,
    pub summary: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Report {
    pub generated_at: String,
    pub listing: String,
    pub status: String,
    pub collected: usize,
    pub failed_pages: Vec<u32>,
    pub countries: Vec<CountryCount>,
    pub filter: Option<FilteredPage>,
}

impl Report {
    pub(crate) fn new(listing: &str, aggregation: &Aggregation, view: Option<&FilterView>) -> Self {
        let (status, failed_pages) = match &aggregation.status {
            AggregationStatus::Complete {
                total_items,
                total_pages,
                failed_pages,
            } => (
                format!("{total_items} listings stated over {total_pages} pages"),
                failed_pages.clone(),
            ),
            AggregationStatus::TotalUnknown => {
                ("total unknown, first page only".to_string(), Vec::new())
            }
            AggregationStatus::InvalidLocation => {
                ("invalid listing URL, first page only".to_string(), Vec::new())
            }
        };

        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            listing: listing.to_string(),
            status,
            collected: aggregation.dataset.len(),
            failed_pages,
            countries: aggregation
                .dataset
                .country_counts()
                .into_iter()
                .map(|(country, listings)| CountryCount { country, listings })
                .collect(),
            filter: view.map(|view| FilteredPage {
                country: view.selected_country.clone(),
                page: view.current_page,
                total_pages: view.total_pages,
                summary: view.summary.to_string(),
                rows: view.rows.len(),
            }),
        }
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Listing:   {}", self.listing);
        let _ = writeln!(out, "Generated: {}", self.generated_at);
        let _ = writeln!(out, "Status:    {}", self.status);
        let _ = writeln!(out, "Collected: {} listings", self.collected);
        if !self.failed_pages.is_empty() {
            let pages: Vec<String> = self.failed_pages.iter().map(u32::to_string).collect();
            let _ = writeln!(out, "Failed:    pages {}", pages.join(", "));
        }

        let width = self
            .countries
            .iter()
            .map(|entry| entry.country.chars().count())
            .max()
            .unwrap_or(0);
        let _ = writeln!(out, "\nShips from:");
        for entry in &self.countries {
            let _ = writeln!(out, "  {:<width$}  {:>6}", entry.country, entry.listings);
        }

        if let Some(filter) = &self.filter {
            let label = if filter.country.is_empty() {
                "All Countries"
            } else {
                filter.country.as_str()
            };
            let _ = writeln!(
                out,
                "\n{label}, page {} of {}: {}",
                filter.page, filter.total_pages, filter.summary
            );
        }
        out
    }

    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
