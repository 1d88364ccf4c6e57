use pretty_assertions::assert_eq;
use shipsfrom_core::{Dataset, Item, RowPayload};

fn item(country: &str, id: usize) -> Item {
    Item::new(country, RowPayload::new(format!("<tr><td>{id}</td></tr>"))).unwrap()
}

fn sample() -> Dataset {
    ["Germany", "Japan", "germany", "Germany", "United States", "Japan"]
        .iter()
        .enumerate()
        .map(|(id, country)| item(country, id))
        .collect()
}

#[test]
fn item_rejects_blank_country_and_collapses_whitespace() {
    assert!(Item::new("   ", RowPayload::new("<tr></tr>")).is_none());
    assert!(Item::new("", RowPayload::new("<tr></tr>")).is_none());

    let item = Item::new("  United \n   Kingdom ", RowPayload::new("<tr></tr>")).unwrap();
    assert_eq!(item.shipping_country(), "United Kingdom");
}

#[test]
fn unique_countries_sorted_without_duplicates() {
    let countries = sample().unique_countries();
    assert_eq!(countries, vec!["Germany", "Japan", "United States", "germany"]);

    let mut sorted = countries.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(countries, sorted);
}

#[test]
fn filter_is_exact_and_case_sensitive() {
    let dataset = sample();
    let germany = dataset.filtered("Germany");
    assert_eq!(germany.len(), 2);
    assert!(germany
        .iter()
        .all(|item| item.shipping_country() == "Germany"));
    assert_eq!(dataset.filtered("germany").len(), 1);
    assert!(dataset.filtered("Germ").is_empty());
}

#[test]
fn empty_filter_keeps_everything_in_order() {
    let dataset = sample();
    let all: Vec<&Item> = dataset.filtered("");
    let expected: Vec<&Item> = dataset.items().iter().collect();
    assert_eq!(all, expected);
}

#[test]
fn country_counts_follow_country_order() {
    assert_eq!(
        sample().country_counts(),
        vec![
            ("Germany".to_string(), 2),
            ("Japan".to_string(), 2),
            ("United States".to_string(), 1),
            ("germany".to_string(), 1),
        ]
    );
}

#[test]
fn extend_appends_after_existing_items() {
    let mut dataset = Dataset::new(vec![item("Japan", 0)]);
    dataset.extend(vec![item("France", 1), item("Chile", 2)]);
    let countries: Vec<&str> = dataset
        .items()
        .iter()
        .map(Item::shipping_country)
        .collect();
    assert_eq!(countries, vec!["Japan", "France", "Chile"]);
    assert!(dataset.contains_country("Chile"));
    assert!(!dataset.contains_country("chile"));
}
