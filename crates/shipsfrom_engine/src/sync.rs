//! Reflects filter state into the host document and the address bar.

use shipsfrom_core::{FilterView, QueryParams, RowPayload};
use shipsfrom_logging::{filter_debug, filter_warn};

use crate::config::ListingSelectors;
use crate::HostDocument;

/// Rebuilds the table body, every pagination summary and the link targets from `view`.
pub fn render_view<H: HostDocument + ?Sized>(
    host: &H,
    selectors: &ListingSelectors,
    query: &QueryParams,
    view: &FilterView,
) {
    let rows: Vec<&str> = view.rows.iter().map(RowPayload::as_str).collect();
    if !host.replace_children(&selectors.table_body, &rows) {
        filter_warn!("listing table body not found; {} rows not rendered", rows.len());
    }

    let summary = view.summary.to_string();
    let updated = host.set_text_all(&selectors.pagination_total, &summary);
    filter_debug!("rendered {} rows, summary \"{summary}\" on {updated} elements", rows.len());

    retarget_pagination_links(host, selectors, query, &view.selected_country);
}

/// Points native pagination links at the same country filter, so a followed link keeps it.
pub fn retarget_pagination_links<H: HostDocument + ?Sized>(
    host: &H,
    selectors: &ListingSelectors,
    query: &QueryParams,
    country: &str,
) {
    let base = host.location();
    for link in host.links(&selectors.pagination_links) {
        let Some(href) = link.href.as_deref() else {
            continue;
        };
        match query.link_with_country(&base, href, country) {
            Some(target) if target != href => {
                host.set_link_href(&selectors.pagination_links, link.index, &target);
            }
            Some(_) => {}
            None => filter_debug!("left pagination link {href:?} untouched"),
        }
    }
}

/// Writes page and country into the address bar through a history replace.
pub fn replace_url<H: HostDocument + ?Sized>(
    host: &H,
    query: &QueryParams,
    page: u32,
    country: &str,
) {
    let location = host.location();
    match query.with_filter_state(&location, page, country) {
        Some(url) if url != location => host.replace_location(&url),
        Some(_) => {}
        None => filter_warn!("cannot rewrite unparsable location {location:?}"),
    }
}
