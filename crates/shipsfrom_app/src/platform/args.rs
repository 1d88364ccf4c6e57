use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shipsfrom",
    version,
    about = "Collects every listing of a marketplace search and groups it by shipping country.",
    long_about = "Fetches all result pages of a marketplace search, reports how many listings ship from each country and, with --country, shows the first filtered page.\n\nExamples:\n  shipsfrom 'https://www.discogs.com/sell/list?format=Vinyl'\n  shipsfrom 'https://www.discogs.com/sell/list?format=Vinyl' --country Germany --page 2\n  shipsfrom 'https://www.discogs.com/sell/list?format=Vinyl' --config filter.ron --format json"
)]
pub struct CliArgs {
    #[arg(value_name = "URL", help = "Listing URL to aggregate.")]
    pub url: String,

    #[arg(
        long,
        value_name = "COUNTRY",
        help_heading = "Filter",
        help = "Show the listings shipping from this country."
    )]
    pub country: Option<String>,

    #[arg(
        long,
        value_name = "N",
        default_value_t = 1,
        help_heading = "Filter",
        help = "Filtered page to show with --country."
    )]
    pub page: u32,

    #[arg(
        long,
        value_name = "N",
        help_heading = "Filter",
        help = "Items per filtered page (defaults to the configured page size)."
    )]
    pub limit: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help_heading = "Input",
        help = "RON file overriding selectors, timeouts and page sizes."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value_t = ReportFormat::Text,
        help_heading = "Output",
        help = "Report format."
    )]
    pub format: ReportFormat,

    #[arg(
        long,
        help_heading = "Output",
        help = "Also write logs to ./shipsfrom.log."
    )]
    pub log_file: bool,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,
}
