//! Ships-from filter core: pure data model, filter state machine and view-model helpers.
mod dataset;
mod effect;
mod msg;
mod pagination;
mod query;
mod state;
mod update;
mod view_model;

pub use dataset::{Dataset, Item, RowPayload};
pub use effect::Effect;
pub use msg::Msg;
pub use pagination::{format_thousands, parse_total_items, total_pages, PageLink};
pub use query::{InitialQuery, QueryParams};
pub use state::{FilterState, DEFAULT_ITEMS_PER_PAGE};
pub use update::update;
pub use view_model::{FilterView, PaginationSummary};
