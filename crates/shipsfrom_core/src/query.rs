use serde::Deserialize;
use url::Url;

/// Filter state carried in a listing URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitialQuery {
    pub page: Option<u32>,
    pub country: String,
}

/// Names of the query parameters the filter reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Host page number.
    pub page: String,
    /// Host page size.
    pub limit: String,
    /// Active country filter; owned by the filter, ignored by the host.
    pub country: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            limit: "limit".to_string(),
            country: "ships_from".to_string(),
        }
    }
}

impl QueryParams {
    /// Reads the page and country carried over from a reload or a shared link.
    pub fn initial_query(&self, location: &str) -> InitialQuery {
        let Ok(url) = Url::parse(location) else {
            return InitialQuery::default();
        };
        InitialQuery {
            page: positive_param(&url, &self.page),
            country: param(&url, &self.country)
                .map(|country| country.trim().to_string())
                .unwrap_or_default(),
        }
    }

    /// Host page number of `location`, 1 when absent.
    pub fn current_page(&self, location: &str) -> u32 {
        Url::parse(location)
            .ok()
            .and_then(|url| positive_param(&url, &self.page))
            .unwrap_or(1)
    }

    /// Host page size of `location`, if it states one.
    pub fn page_size(&self, location: &str) -> Option<u32> {
        Url::parse(location)
            .ok()
            .and_then(|url| positive_param(&url, &self.limit))
    }

    /// URL of result page `page` at `limit` items per page, derived from the listing URL.
    pub fn page_fetch_url(&self, listing: &Url, page: u32, limit: u32) -> Url {
        let mut url = listing.clone();
        rewrite_query(
            &mut url,
            &[
                (self.page.as_str(), Some(page.to_string())),
                (self.limit.as_str(), Some(limit.to_string())),
                (self.country.as_str(), None),
            ],
        );
        url
    }

    /// `location` with the page and country filter replaced.
    /// An empty country removes the parameter.
    pub fn with_filter_state(&self, location: &str, page: u32, country: &str) -> Option<String> {
        let mut url = Url::parse(location).ok()?;
        rewrite_query(
            &mut url,
            &[
                (self.page.as_str(), Some(page.to_string())),
                (self.country.as_str(), non_empty(country)),
            ],
        );
        Some(url.into())
    }

    /// Resolves a pagination link against `base` and sets its country parameter.
    pub fn link_with_country(&self, base: &str, href: &str, country: &str) -> Option<String> {
        let base = Url::parse(base).ok()?;
        let mut url = base.join(href).ok()?;
        rewrite_query(&mut url, &[(self.country.as_str(), non_empty(country))]);
        Some(url.into())
    }

    /// Identity of the listing shown at `location`, ignoring the parameters the filter rewrites.
    pub fn listing_key(&self, location: &str) -> String {
        let Ok(mut url) = Url::parse(location) else {
            return location.to_string();
        };
        url.set_fragment(None);
        rewrite_query(
            &mut url,
            &[(self.page.as_str(), None), (self.country.as_str(), None)],
        );
        url.into()
    }
}

fn param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn positive_param(url: &Url, name: &str) -> Option<u32> {
    param(url, name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Drops every parameter named in `overrides`, then appends the ones with a value.
fn rewrite_query(url: &mut Url, overrides: &[(&str, Option<String>)]) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !overrides.iter().any(|(name, _)| key == name))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let additions: Vec<(&str, &str)> = overrides
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|value| (*name, value)))
        .collect();

    if kept.is_empty() && additions.is_empty() {
        url.set_query(None);
        return;
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in &kept {
        pairs.append_pair(key, value);
    }
    for (key, value) in additions {
        pairs.append_pair(key, value);
    }
}
