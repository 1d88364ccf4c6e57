//! Markup the filter adds to the host page.

use shipsfrom_logging::{filter_debug, filter_info, filter_warn};

use crate::{HostDocument, LifecycleError};

pub const FILTER_CONTROL: &str = ".ships-from-filter";
pub const COUNTRY_SELECT: &str = "#shipsFromSelect";
pub const LOADING_INDICATOR: &str = ".ships-from-loading";

const ALL_COUNTRIES: &str = "All Countries";
const LOADING_TEXT: &str =
    "Loading country filter... This may take a minute as all result pages are analyzed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    Inserted { anchor: String },
    AlreadyPresent,
}

pub fn filter_control_markup(countries: &[String]) -> String {
    let mut options = format!("<option value=\"\">{ALL_COUNTRIES}</option>");
    for country in countries {
        let country = escape_html(country);
        options.push_str(&format!("<option value=\"{country}\">{country}</option>"));
    }
    format!(
        "<div class=\"ships-from-filter\">\
         <label for=\"shipsFromSelect\">Filter by Ships From:</label> \
         <select id=\"shipsFromSelect\">{options}</select>\
         </div>"
    )
}

/// Places the filter control after the first anchor that exists.
/// A control already on the page is left alone.
pub fn inject_filter_control<H: HostDocument + ?Sized>(
    host: &H,
    anchors: &[String],
    countries: &[String],
) -> Result<InjectOutcome, LifecycleError> {
    if host.exists(FILTER_CONTROL) {
        filter_info!("filter control already present, skipping injection");
        return Ok(InjectOutcome::AlreadyPresent);
    }

    let markup = filter_control_markup(countries);
    for anchor in anchors {
        if host.insert_after(anchor, &markup) {
            filter_info!("filter control with {} countries placed after {anchor}", countries.len());
            return Ok(InjectOutcome::Inserted {
                anchor: anchor.clone(),
            });
        }
        filter_debug!("insertion anchor {anchor} not found");
    }

    filter_warn!("no insertion point for the filter control");
    Err(LifecycleError::NoInsertionPoint)
}

pub fn show_loading_indicator<H: HostDocument + ?Sized>(host: &H, anchors: &[String]) -> bool {
    if host.exists(LOADING_INDICATOR) {
        return true;
    }
    let markup = format!("<div class=\"ships-from-loading\">{LOADING_TEXT}</div>");
    anchors.iter().any(|anchor| host.insert_after(anchor, &markup))
}

pub fn hide_loading_indicator<H: HostDocument + ?Sized>(host: &H) {
    host.remove_all(LOADING_INDICATOR);
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
