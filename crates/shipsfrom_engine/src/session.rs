use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shipsfrom_core::{update, Dataset, Effect, FilterState, InitialQuery, Msg, PageLink};
use shipsfrom_logging::{filter_debug, filter_info};

use crate::config::FilterConfig;
use crate::inject::COUNTRY_SELECT;
use crate::sync::{render_view, replace_url};
use crate::{HostDocument, HostLink};

/// What the browser should do with a pagination click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDecision {
    /// The filter handled it; cancel the native navigation.
    Intercept,
    PassThrough,
}

/// Filter state of one activation together with the configuration it renders with.
#[derive(Debug)]
pub struct FilterSession {
    state: FilterState,
    config: Rc<FilterConfig>,
}

impl FilterSession {
    pub fn new(config: Rc<FilterConfig>) -> Self {
        Self {
            state: FilterState::with_default_page_size(config.default_items_per_page),
            config,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Runs `msg` through the state machine and applies the resulting effects to `host`.
    pub fn dispatch<H: HostDocument + ?Sized>(&mut self, host: &H, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.apply(host, &effects);
        effects
    }

    /// Installs the aggregated dataset and restores a filter carried in the URL.
    pub fn load<H: HostDocument + ?Sized>(
        &mut self,
        host: &H,
        dataset: Dataset,
        restore: InitialQuery,
    ) {
        let page_size = self.page_size(host);
        self.dispatch(
            host,
            Msg::DatasetLoaded {
                dataset,
                restore,
                page_size,
            },
        );
        if self.state.is_filter_active() {
            filter_info!("restored filter {:?}", self.state.selected_country());
            host.set_value(COUNTRY_SELECT, self.state.selected_country());
        }
    }

    pub fn select_country<H: HostDocument + ?Sized>(&mut self, host: &H, country: &str) {
        filter_info!("country selected: {country:?}");
        let page_size = self.page_size(host);
        self.dispatch(
            host,
            Msg::CountrySelected {
                country: country.to_string(),
                page_size,
            },
        );
    }

    pub fn page_size_changed<H: HostDocument + ?Sized>(&mut self, host: &H) {
        let page_size = self.page_size(host);
        self.dispatch(host, Msg::PageSizeChanged { page_size });
    }

    pub fn page_link_clicked<H: HostDocument + ?Sized>(
        &mut self,
        host: &H,
        link: &HostLink,
    ) -> ClickDecision {
        if !self.state.is_filter_active() {
            return ClickDecision::PassThrough;
        }
        let link = PageLink::classify(&link.text, link.href.as_deref());
        filter_debug!("pagination click {link:?} on page {}", self.state.current_page());
        let page_size = self.page_size(host);
        self.dispatch(host, Msg::PageLinkClicked { link, page_size });
        ClickDecision::Intercept
    }

    fn page_size<H: HostDocument + ?Sized>(&self, host: &H) -> Option<String> {
        host.value_of(&self.config.selectors.items_per_page)
    }

    fn apply<H: HostDocument + ?Sized>(&self, host: &H, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Render => render_view(
                    host,
                    &self.config.selectors,
                    &self.config.query,
                    &self.state.view(),
                ),
                Effect::ReplaceUrl { page, country } => {
                    replace_url(host, &self.config.query, *page, country)
                }
            }
        }
    }
}

/// Holds the session of the newest activation.
///
/// Each activation takes a generation number up front; a session finishing
/// after a newer activation began is dropped instead of installed.
#[derive(Default)]
pub struct SessionSlot {
    generation: Cell<u64>,
    session: RefCell<Option<FilterSession>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation and drops the current session.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.session.borrow_mut().take();
        generation
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    pub fn install(&self, generation: u64, session: FilterSession) -> bool {
        if !self.is_current(generation) {
            filter_info!(
                "dropping session of activation {generation}; activation {} is newer",
                self.generation.get()
            );
            return false;
        }
        *self.session.borrow_mut() = Some(session);
        true
    }

    /// Runs `f` against the installed session, if any. Must not be re-entered from `f`.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut FilterSession) -> R) -> Option<R> {
        self.session.borrow_mut().as_mut().map(f)
    }
}
