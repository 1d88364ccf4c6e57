use crate::{Dataset, InitialQuery, PageLink};

/// Inputs to the filter state machine.
///
/// `page_size` is always the raw value read from the host's items-per-page
/// control at the time of the event; unreadable values fall back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Aggregation finished; `restore` carries the filter found in the URL.
    DatasetLoaded {
        dataset: Dataset,
        restore: InitialQuery,
        page_size: Option<String>,
    },
    /// User picked a country in the filter control (empty = all countries).
    CountrySelected {
        country: String,
        page_size: Option<String>,
    },
    /// User clicked a native pagination link.
    PageLinkClicked {
        link: PageLink,
        page_size: Option<String>,
    },
    /// The host's items-per-page control changed.
    PageSizeChanged { page_size: Option<String> },
    /// Fallback for placeholder wiring.
    NoOp,
}
