//! Ships-from engine: page fetching, aggregation and the host-document side of the filter.
mod aggregate;
mod config;
mod decode;
mod fetch;
mod host;
mod inject;
mod lifecycle;
mod parse;
mod session;
mod sync;
mod types;

pub use aggregate::{Aggregation, AggregationStatus, Aggregator};
pub use config::{ConfigError, FilterConfig, ListingSelectors, PollPolicy, MAX_PAGE_SIZE};
pub use decode::decode_page;
pub use fetch::{FetchSettings, Fetcher};
#[cfg(not(target_arch = "wasm32"))]
pub use fetch::ReqwestFetcher;
pub use host::{HostDocument, HostLink};
pub use inject::{
    filter_control_markup, hide_loading_indicator, inject_filter_control,
    show_loading_indicator, InjectOutcome, COUNTRY_SELECT, FILTER_CONTROL, LOADING_INDICATOR,
};
#[cfg(not(target_arch = "wasm32"))]
pub use lifecycle::TokioTimer;
pub use lifecycle::{
    wait_for_element, Activation, LifecycleController, LifecycleError, NavigationWatcher, Timer,
};
pub use parse::ListingParser;
pub use session::{ClickDecision, FilterSession, SessionSlot};
pub use sync::{render_view, replace_url, retarget_pagination_links};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
