//! Native command-line front end: one aggregation run against a live listing.

mod args;
mod config;
mod logging;
mod report;

use anyhow::Context;
use clap::Parser;
use shipsfrom_core::{update, FilterState, FilterView, InitialQuery, Msg, PageLink};
use shipsfrom_engine::{
    decode_page, Aggregation, Aggregator, FilterConfig, Fetcher, ListingParser, ReqwestFetcher,
};
use shipsfrom_logging::{filter_info, set_activation};

use args::{CliArgs, ReportFormat};
use logging::LogDestination;
use report::Report;

pub fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let destination = if args.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, logging::level_for(args.verbose));

    let config = config::load_config(args.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .context("failed to start the async runtime")?;
    let report = runtime.block_on(run(&args, &config))?;

    let output = match args.format {
        ReportFormat::Text => report.to_text(),
        ReportFormat::Json => report.to_json().context("failed to encode report")?,
    };
    println!("{output}");
    Ok(())
}

async fn run(args: &CliArgs, config: &FilterConfig) -> anyhow::Result<Report> {
    set_activation(1);
    let parser = ListingParser::new(&config.selectors)?;
    let fetcher = ReqwestFetcher::new(config.fetch.clone());

    let first = fetcher
        .fetch(&args.url)
        .await
        .with_context(|| format!("failed to fetch {}", args.url))?;
    let location = first.metadata.final_url.clone();
    let html = decode_page(&first.bytes, first.metadata.content_type.as_deref());

    let aggregation = Aggregator::new(&parser, &fetcher, config)
        .aggregate(&html, &location)
        .await;
    filter_info!("collected {} listings", aggregation.dataset.len());

    let view = args
        .country
        .as_deref()
        .map(|country| filtered_view(config, &aggregation, country, args));
    Ok(Report::new(&location, &aggregation, view.as_ref()))
}

/// Drives the filter state machine the same way the browser does for a selection and a page jump.
fn filtered_view(
    config: &FilterConfig,
    aggregation: &Aggregation,
    country: &str,
    args: &CliArgs,
) -> FilterView {
    let state = FilterState::with_default_page_size(config.default_items_per_page);
    let (state, _) = update(
        state,
        Msg::DatasetLoaded {
            dataset: aggregation.dataset.clone(),
            restore: InitialQuery::default(),
            page_size: args.limit.clone(),
        },
    );
    let (state, _) = update(
        state,
        Msg::CountrySelected {
            country: country.to_string(),
            page_size: args.limit.clone(),
        },
    );
    let (state, _) = update(
        state,
        Msg::PageLinkClicked {
            link: PageLink::Numbered(args.page),
            page_size: args.limit.clone(),
        },
    );
    state.view()
}
