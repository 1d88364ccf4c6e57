//! Drives one activation of the filter: wait for the listing, aggregate, inject, hand over a session.

use std::rc::Rc;
use std::time::Duration;

use shipsfrom_core::QueryParams;
use shipsfrom_logging::{
    current_activation, filter_debug, filter_error, filter_info, filter_warn, set_activation,
};

use crate::aggregate::{AggregationStatus, Aggregator};
use crate::config::{ConfigError, FilterConfig, PollPolicy};
use crate::fetch::Fetcher;
use crate::inject::{
    hide_loading_indicator, inject_filter_control, show_loading_indicator, FILTER_CONTROL,
};
use crate::parse::ListingParser;
use crate::session::{FilterSession, SessionSlot};
use crate::{HostDocument, HostLink};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("`{selector}` did not appear after {attempts} attempts")]
    Timeout { selector: String, attempts: u32 },
    #[error("no insertion point for the filter control")]
    NoInsertionPoint,
}

/// Suspends the current task. Single-threaded, like [`Fetcher`].
#[async_trait::async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls until `selector` matches, checking at most `policy.max_attempts` times.
pub async fn wait_for_element<H, T>(
    host: &H,
    timer: &T,
    selector: &str,
    policy: &PollPolicy,
) -> Result<(), LifecycleError>
where
    H: HostDocument + ?Sized,
    T: Timer + ?Sized,
{
    let activation = current_activation();
    for attempt in 1..=policy.max_attempts {
        if host.exists(selector) {
            filter_debug!("`{selector}` present after {attempt} attempts");
            return Ok(());
        }
        if attempt < policy.max_attempts {
            timer.sleep(policy.interval()).await;
            set_activation(activation);
        }
    }
    Err(LifecycleError::Timeout {
        selector: selector.to_string(),
        attempts: policy.max_attempts,
    })
}

#[derive(Debug)]
pub enum Activation {
    Ready {
        session: FilterSession,
        status: AggregationStatus,
    },
    /// The page already carries a filter control.
    AlreadyActive,
    /// A newer activation began while this one was waiting; the page was left to it.
    Superseded,
}

/// Notices client-side navigation to a different listing.
#[derive(Debug, Clone)]
pub struct NavigationWatcher {
    query: QueryParams,
    last_key: String,
}

impl NavigationWatcher {
    pub fn new(query: QueryParams, location: &str) -> Self {
        let last_key = query.listing_key(location);
        Self { query, last_key }
    }

    /// Records `location` and reports whether it shows a different listing than before.
    /// Page and country changes made by the filter itself do not count.
    pub fn observe(&mut self, location: &str) -> bool {
        let key = self.query.listing_key(location);
        if key == self.last_key {
            return false;
        }
        filter_info!("navigation detected: {} -> {key}", self.last_key);
        self.last_key = key;
        true
    }
}

pub struct LifecycleController<F, T> {
    config: Rc<FilterConfig>,
    parser: ListingParser,
    fetcher: F,
    timer: T,
}

impl<F: Fetcher, T: Timer> LifecycleController<F, T> {
    pub fn new(config: FilterConfig, fetcher: F, timer: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let parser = ListingParser::new(&config.selectors)?;
        Ok(Self {
            config: Rc::new(config),
            parser,
            fetcher,
            timer,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Runs activation `generation` of `slot` against `host` up to the point where a session is ready.
    /// Returns [`Activation::Superseded`] without touching the page once a newer generation has begun.
    pub async fn activate<H: HostDocument + ?Sized>(
        &self,
        host: &H,
        slot: &SessionSlot,
        generation: u64,
    ) -> Result<Activation, LifecycleError> {
        set_activation(generation);
        let selectors = &self.config.selectors;
        filter_info!("activation started on {}", host.location());

        let waited = self.wait_for_listing(host).await;
        if !self.still_current(slot, generation) {
            return Ok(Activation::Superseded);
        }
        if let Err(err) = waited {
            filter_error!("{err}; giving up until the next navigation");
            return Err(err);
        }
        if host.exists(FILTER_CONTROL) {
            filter_info!("filter control already present");
            return Ok(Activation::AlreadyActive);
        }

        let location = host.location();
        let restore = self.config.query.initial_query(&location);
        show_loading_indicator(host, &selectors.insertion_anchors);

        let aggregation = Aggregator::new(&self.parser, &self.fetcher, &self.config)
            .aggregate(&host.snapshot_html(), &location)
            .await;
        if !self.still_current(slot, generation) {
            return Ok(Activation::Superseded);
        }
        let countries = aggregation.dataset.unique_countries();
        let injected =
            inject_filter_control(host, &selectors.insertion_anchors, &countries);
        hide_loading_indicator(host);
        injected?;

        let mut session = FilterSession::new(Rc::clone(&self.config));
        session.load(host, aggregation.dataset, restore);
        Ok(Activation::Ready {
            session,
            status: aggregation.status,
        })
    }

    /// Resolves once the address shows a different listing and the settle delay has passed.
    pub async fn wait_for_navigation<H: HostDocument + ?Sized>(
        &self,
        host: &H,
        watcher: &mut NavigationWatcher,
    ) {
        loop {
            self.timer.sleep(self.config.url_poll_interval()).await;
            if watcher.observe(&host.location()) {
                self.timer.sleep(self.config.settle_delay()).await;
                return;
            }
        }
    }

    /// Pagination links not yet carrying the click interceptor, now marked as handled.
    pub fn claim_pagination_links<H: HostDocument + ?Sized>(&self, host: &H) -> Vec<HostLink> {
        let selector = &self.config.selectors.pagination_links;
        host.links(selector)
            .into_iter()
            .filter(|link| !link.handled)
            .filter(|link| host.mark_link_handled(selector, link.index))
            .collect()
    }

    /// Restores the log tag after an await and reports whether `generation` still owns the page.
    fn still_current(&self, slot: &SessionSlot, generation: u64) -> bool {
        set_activation(generation);
        let current = slot.is_current(generation);
        if !current {
            filter_warn!("superseded by activation {}; leaving the page alone", slot.generation());
        }
        current
    }

    async fn wait_for_listing<H: HostDocument + ?Sized>(
        &self,
        host: &H,
    ) -> Result<(), LifecycleError> {
        let selectors = &self.config.selectors;
        wait_for_element(host, &self.timer, &selectors.table, &self.config.poll).await?;
        wait_for_element(host, &self.timer, &selectors.seller_info, &self.config.poll).await
    }
}
