use clap::Parser;

/// Displays campaign-finance contests: candidates, reporting periods and
/// money raised, one table (and optionally one bar chart) per contest.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON dataset to display. When omitted, the
    /// dataset bundled at build time is used.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path or 'stdout') If specified, the contests summary will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, campfin will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default '2014 Campaign Finances') The top-level dataset key holding the records.
    #[clap(long, value_parser)]
    pub title: Option<String>,

    /// (default 'Sheet1') The sheet key under the title, for datasets using the
    /// nested shape. Flat datasets ignore it.
    #[clap(long, value_parser)]
    pub sheet: Option<String>,

    /// (default /contests) The route to display. Unmatched routes redirect to /contests.
    #[clap(long, value_parser)]
    pub route: Option<String>,

    /// (slug, optional) Switch every contest that has this reporting interval to it
    /// before rendering, e.g. 'pre-general'.
    #[clap(long, value_parser)]
    pub interval: Option<String>,

    /// If passed as an argument, no bar charts will be rendered.
    #[clap(long, takes_value = false)]
    pub no_charts: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
