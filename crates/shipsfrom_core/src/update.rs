use crate::state::SelectOrigin;
use crate::{Effect, FilterState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FilterState, msg: Msg) -> (FilterState, Vec<Effect>) {
    let effects = match msg {
        Msg::DatasetLoaded {
            dataset,
            restore,
            page_size,
        } => {
            state.install_dataset(dataset);
            state.apply_page_size(page_size.as_deref());
            if let Some(page) = restore.page {
                state.set_current_page(page);
            }
            // Without a usable carried-over filter the native page stays as rendered by the host.
            if restore.country.is_empty() || !state.dataset().contains_country(&restore.country) {
                Vec::new()
            } else {
                state.select_country(restore.country, SelectOrigin::Pagination);
                render_effects(&state)
            }
        }
        Msg::CountrySelected { country, page_size } => {
            state.apply_page_size(page_size.as_deref());
            state.select_country(country, SelectOrigin::User);
            render_effects(&state)
        }
        Msg::PageLinkClicked { link, page_size } => {
            if !state.is_filter_active() {
                return (state, Vec::new());
            }
            let target = link.target(state.current_page());
            state.set_current_page(target);
            state.apply_page_size(page_size.as_deref());
            let country = state.selected_country().to_string();
            state.select_country(country, SelectOrigin::Pagination);
            render_effects(&state)
        }
        Msg::PageSizeChanged { page_size } => {
            if !state.is_filter_active() {
                return (state, Vec::new());
            }
            state.apply_page_size(page_size.as_deref());
            state.recompute();
            render_effects(&state)
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn render_effects(state: &FilterState) -> Vec<Effect> {
    vec![
        Effect::Render,
        Effect::ReplaceUrl {
            page: state.current_page(),
            country: state.selected_country().to_string(),
        },
    ]
}
