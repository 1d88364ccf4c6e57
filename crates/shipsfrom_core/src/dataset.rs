use std::collections::{BTreeMap, BTreeSet};

/// Markup of one listing row, kept verbatim so it can be re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPayload(String);

impl RowPayload {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One marketplace listing and the country its seller ships from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    shipping_country: String,
    payload: RowPayload,
}

impl Item {
    /// Builds an item, collapsing whitespace in the country name.
    /// Returns `None` when nothing is left of the country.
    pub fn new(shipping_country: &str, payload: RowPayload) -> Option<Self> {
        let shipping_country = shipping_country
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if shipping_country.is_empty() {
            return None;
        }
        Some(Self {
            shipping_country,
            payload,
        })
    }

    pub fn shipping_country(&self) -> &str {
        &self.shipping_country
    }

    pub fn payload(&self) -> &RowPayload {
        &self.payload
    }
}

/// Every listing collected for the current activation, in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// Distinct countries, sorted ascending.
    pub fn unique_countries(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.shipping_country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Listing count per country, sorted by country.
    pub fn country_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.shipping_country.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(country, count)| (country.to_string(), count))
            .collect()
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.shipping_country == country)
    }

    /// Items shipping from exactly `country` (case-sensitive).
    /// An empty `country` means no filter and yields every item in order.
    pub fn filtered(&self, country: &str) -> Vec<&Item> {
        if country.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.shipping_country == country)
            .collect()
    }
}

impl FromIterator<Item> for Dataset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
