use std::sync::Once;

use pretty_assertions::assert_eq;
use shipsfrom_core::{
    update, Dataset, Effect, FilterState, InitialQuery, Item, Msg, PageLink, PaginationSummary,
    RowPayload,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shipsfrom_logging::initialize_for_tests);
}

fn row(id: usize) -> RowPayload {
    RowPayload::new(format!("<tr data-id=\"{id}\"></tr>"))
}

/// 60 German listings interleaved with 40 from elsewhere.
fn marketplace() -> Dataset {
    (0..100)
        .map(|id| {
            let country = match id % 5 {
                0 | 2 | 4 => "Germany",
                1 => "Japan",
                _ => "France",
            };
            Item::new(country, row(id)).unwrap()
        })
        .collect()
}

fn loaded(restore: InitialQuery) -> (FilterState, Vec<Effect>) {
    update(
        FilterState::new(),
        Msg::DatasetLoaded {
            dataset: marketplace(),
            restore,
            page_size: Some("25".to_string()),
        },
    )
}

fn select(state: FilterState, country: &str) -> (FilterState, Vec<Effect>) {
    update(
        state,
        Msg::CountrySelected {
            country: country.to_string(),
            page_size: Some("25".to_string()),
        },
    )
}

fn click(state: FilterState, link: PageLink) -> (FilterState, Vec<Effect>) {
    update(
        state,
        Msg::PageLinkClicked {
            link,
            page_size: Some("25".to_string()),
        },
    )
}

#[test]
fn loading_without_carried_filter_leaves_native_page_alone() {
    init_logging();
    let (mut state, effects) = loaded(InitialQuery::default());

    assert!(effects.is_empty());
    assert_eq!(state.dataset().len(), 100);
    assert_eq!(state.total_filtered(), 100);
    assert!(!state.is_filter_active());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn selecting_germany_shows_first_page_of_matches() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, effects) = select(state, "Germany");
    let view = state.view();

    assert_eq!(view.rows.len(), 25);
    assert_eq!(view.total_filtered, 60);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.summary.to_string(), "1 - 25 of 60");
    assert_eq!(view.rows[0], row(0));
    assert_eq!(view.rows[1], row(2));
    assert_eq!(
        effects,
        vec![
            Effect::Render,
            Effect::ReplaceUrl {
                page: 1,
                country: "Germany".to_string(),
            },
        ]
    );
}

#[test]
fn next_while_filtered_advances_one_page() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Germany");
    let (state, effects) = click(state, PageLink::Next);
    let view = state.view();

    assert_eq!(state.current_page(), 2);
    assert_eq!(view.summary.to_string(), "26 - 50 of 60");
    assert_eq!(
        effects,
        vec![
            Effect::Render,
            Effect::ReplaceUrl {
                page: 2,
                country: "Germany".to_string(),
            },
        ]
    );

    let (state, _) = click(state, PageLink::Next);
    assert_eq!(state.view().summary.to_string(), "51 - 60 of 60");
    assert_eq!(state.view().rows.len(), 10);
}

#[test]
fn prev_never_goes_below_first_page() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Japan");
    let (state, effects) = click(state, PageLink::Prev);

    assert_eq!(state.current_page(), 1);
    assert_eq!(effects.len(), 2);
}

#[test]
fn numbered_link_jumps_and_keeps_filter() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Germany");
    let (state, _) = click(state, PageLink::Numbered(3));

    assert_eq!(state.current_page(), 3);
    assert_eq!(state.selected_country(), "Germany");
    assert_eq!(state.view().summary.to_string(), "51 - 60 of 60");
}

#[test]
fn pagination_click_without_filter_is_ignored() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let before = state.clone();
    let (next, effects) = click(state, PageLink::Next);

    assert!(effects.is_empty());
    assert_eq!(next, before);
}

#[test]
fn changing_country_resets_to_first_page() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Germany");
    let (state, _) = click(state, PageLink::Numbered(2));
    assert_eq!(state.current_page(), 2);

    let (state, _) = select(state, "France");
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_filtered(), 20);
}

#[test]
fn all_countries_restores_full_dataset_in_order() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Japan");
    let (state, effects) = select(state, "");
    let view = state.view();

    assert!(!state.is_filter_active());
    assert_eq!(view.total_filtered, 100);
    assert_eq!(view.rows, (0..25).map(row).collect::<Vec<_>>());
    assert_eq!(
        effects[1],
        Effect::ReplaceUrl {
            page: 1,
            country: String::new(),
        }
    );
}

#[test]
fn carried_filter_is_restored_on_its_page() {
    init_logging();
    let (state, effects) = loaded(InitialQuery {
        page: Some(2),
        country: "Germany".to_string(),
    });

    assert_eq!(state.current_page(), 2);
    assert_eq!(state.selected_country(), "Germany");
    assert_eq!(state.view().summary.to_string(), "26 - 50 of 60");
    assert_eq!(
        effects[1],
        Effect::ReplaceUrl {
            page: 2,
            country: "Germany".to_string(),
        }
    );
}

#[test]
fn carried_filter_for_unknown_country_is_dropped() {
    init_logging();
    let (state, effects) = loaded(InitialQuery {
        page: Some(4),
        country: "Atlantis".to_string(),
    });

    assert!(effects.is_empty());
    assert!(!state.is_filter_active());
    assert_eq!(state.total_filtered(), 100);
}

#[test]
fn page_size_read_from_host_control_with_fallback() {
    init_logging();
    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = update(
        state,
        Msg::CountrySelected {
            country: "Germany".to_string(),
            page_size: Some("50".to_string()),
        },
    );
    assert_eq!(state.items_per_page(), 50);
    assert_eq!(state.view().rows.len(), 50);

    let (state, _) = update(
        state,
        Msg::CountrySelected {
            country: "Germany".to_string(),
            page_size: Some("lots".to_string()),
        },
    );
    assert_eq!(state.items_per_page(), 25);

    let (state, _) = update(
        state,
        Msg::PageSizeChanged {
            page_size: Some("0".to_string()),
        },
    );
    assert_eq!(state.items_per_page(), 25);

    let (state, effects) = update(state, Msg::PageSizeChanged { page_size: None });
    assert_eq!(state.items_per_page(), 25);
    assert_eq!(effects.len(), 2);
}

#[test]
fn default_page_size_is_configurable() {
    init_logging();
    let state = FilterState::with_default_page_size(10);
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            dataset: marketplace(),
            restore: InitialQuery::default(),
            page_size: None,
        },
    );
    let (state, _) = update(
        state,
        Msg::CountrySelected {
            country: "Japan".to_string(),
            page_size: None,
        },
    );
    assert_eq!(state.items_per_page(), 10);
    assert_eq!(state.view().summary.to_string(), "1 - 10 of 20");
}

#[test]
fn slice_is_bounded_and_empty_only_past_the_end() {
    init_logging();
    for per_page in [1u32, 7, 25, 60, 100] {
        let (state, _) = loaded(InitialQuery::default());
        let (mut state, _) = update(
            state,
            Msg::CountrySelected {
                country: "Germany".to_string(),
                page_size: Some(per_page.to_string()),
            },
        );
        let last_page = 60u32.div_ceil(per_page);
        for _ in 0..last_page + 2 {
            let view = state.view();
            assert!(view.rows.len() <= per_page as usize);
            assert_eq!(view.rows.is_empty(), view.current_page > last_page);
            let (next, _) = update(
                state,
                Msg::PageLinkClicked {
                    link: PageLink::Next,
                    page_size: Some(per_page.to_string()),
                },
            );
            state = next;
        }
    }
}

#[test]
fn summary_reports_empty_and_past_end() {
    init_logging();
    let (state, _) = update(
        FilterState::new(),
        Msg::CountrySelected {
            country: "Japan".to_string(),
            page_size: None,
        },
    );
    assert_eq!(
        state.view().summary,
        PaginationSummary::Empty {
            country: Some("Japan".to_string())
        }
    );
    assert_eq!(state.view().summary.to_string(), "No listings ship from Japan");

    let (state, _) = loaded(InitialQuery::default());
    let (state, _) = select(state, "Japan");
    let (state, _) = click(state, PageLink::Numbered(9));
    assert_eq!(
        state.view().summary.to_string(),
        "No listings on page 9 of 20"
    );
}

#[test]
fn large_totals_use_thousand_separators() {
    init_logging();
    let dataset: Dataset = (0..4070)
        .map(|id| Item::new("Germany", row(id)).unwrap())
        .collect();
    let (state, _) = update(
        FilterState::new(),
        Msg::DatasetLoaded {
            dataset,
            restore: InitialQuery {
                page: Some(41),
                country: "Germany".to_string(),
            },
            page_size: Some("100".to_string()),
        },
    );
    assert_eq!(state.view().summary.to_string(), "4,001 - 4,070 of 4,070");
}
