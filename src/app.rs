use log::{debug, info, warn};

use campaign_finance::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod render;
pub mod routes;

/// The dataset bundled at build time, used when no input file is given.
pub const EMBEDDED_DATASET: &str = include_str!("../data/finances.json");

pub const DEFAULT_TITLE: &str = "2014 Campaign Finances";
pub const DEFAULT_SHEET: &str = "Sheet1";
pub const DEFAULT_ROUTE: &str = "/contests";

#[derive(Debug, Snafu)]
pub enum AppError {
    #[snafu(display("Error opening dataset {path}"))]
    OpeningDataset {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing dataset JSON"))]
    ParsingDataset { source: serde_json::Error },
    #[snafu(display("Error opening reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary"))]
    ParsingReference { source: serde_json::Error },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AppResult<T> = Result<T, AppError>;

/// Caller-supplied knobs for the application, gathered before start.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Dataset file to read; the embedded dataset when `None`.
    pub input: Option<String>,
    pub dataset: DatasetOptions,
    pub route: String,
    /// Interval slug to switch contests to before rendering.
    pub interval: Option<String>,
    /// The disableCharts predicate of the bootstrap contract.
    pub disable_charts: bool,
}

impl AppOptions {
    pub fn from_args(args: &Args) -> AppOptions {
        AppOptions {
            input: args.input.clone(),
            dataset: DatasetOptions::new(
                args.title.as_deref().unwrap_or(DEFAULT_TITLE),
                Some(args.sheet.as_deref().unwrap_or(DEFAULT_SHEET)),
            ),
            route: args.route.clone().unwrap_or_else(|| DEFAULT_ROUTE.to_string()),
            interval: args.interval.clone(),
            disable_charts: args.no_charts,
        }
    }
}

/// The host application. Owns the contest view models for its whole life;
/// the renderer only reads them, apart from the interval switch.
pub struct App {
    pub options: AppOptions,
    pub contests: Vec<Contest>,
}

impl App {
    pub fn new(options: AppOptions) -> App {
        App {
            options,
            contests: Vec::new(),
        }
    }

    /// Loads the dataset, builds the contests and renders the requested
    /// route. Returns the rendered text.
    pub fn start(&mut self) -> AppResult<String> {
        let doc = self.read_dataset()?;
        self.contests = load_data(&doc, &self.options.dataset);
        info!("start: built {} contests", self.contests.len());

        if let Some(slug) = self.options.interval.clone() {
            self.switch_interval(&slug);
        }

        let route = routes::resolve(&self.options.route);
        match route {
            routes::Route::ContestOverview => Ok(render::contest_overview(
                &self.contests,
                self.options.disable_charts,
            )),
        }
    }

    fn read_dataset(&self) -> AppResult<JSValue> {
        let contents = match &self.options.input {
            Some(path) => {
                info!("read_dataset: reading {}", path);
                fs::read_to_string(path).context(OpeningDatasetSnafu { path: path.clone() })?
            }
            None => {
                info!("read_dataset: using the embedded dataset");
                EMBEDDED_DATASET.to_string()
            }
        };
        serde_json::from_str(contents.as_str()).context(ParsingDatasetSnafu {})
    }

    /// The interval-switch interaction: each contest that has the slug moves
    /// to it, the others keep their current period.
    fn switch_interval(&mut self, slug: &str) {
        for contest in self.contests.iter_mut() {
            if contest.set_current_interval(slug) {
                debug!("switch_interval: {} -> {}", contest.id, slug);
            } else {
                debug!("switch_interval: {} has no interval {:?}", contest.id, slug);
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct IntervalSummary {
    id: String,
    name: String,
    from: String,
    to: String,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct CandidateSummary {
    candidate: String,
    party: String,
    incumbent: String,
    interval: String,
    amountraised: JSValue,
    cashonhand: JSValue,
    reporturl: String,
    #[serde(rename = "rowNumber")]
    row_number: u64,
}

/// The machine-readable summary of the contests, for --out and --reference.
pub fn build_summary_js(contests: &[Contest]) -> JSValue {
    let mut list: Vec<JSValue> = Vec::new();
    for contest in contests {
        let intervals: Vec<IntervalSummary> = contest
            .intervals
            .iter()
            .map(|iv| IntervalSummary {
                id: iv.id.clone(),
                name: iv.name.clone(),
                from: iv.from.format("%-m/%-d/%Y").to_string(),
                to: iv.to.format("%-m/%-d/%Y").to_string(),
            })
            .collect();
        let candidates: Vec<CandidateSummary> = contest
            .candidates
            .iter()
            .map(|c| {
                let r = c.record();
                CandidateSummary {
                    candidate: r.candidate.clone(),
                    party: r.party.clone(),
                    incumbent: r.incumbent.clone(),
                    interval: r.interval.clone(),
                    amountraised: money_js(r.amountraised),
                    cashonhand: money_js(r.cashonhand),
                    reporturl: r.reporturl.clone(),
                    row_number: r.row_number,
                }
            })
            .collect();
        list.push(json!({
            "id": contest.id,
            "name": contest.name,
            "currentInterval": match &contest.current_interval {
                Some(iv) => json!(iv.id),
                None => JSValue::Null,
            },
            "intervals": intervals,
            "candidates": candidates,
        }));
    }
    json!({ "contests": list })
}

// Unreported money round-trips as the empty string, like the source data.
fn money_js(v: Option<f64>) -> JSValue {
    match v {
        Some(x) => json!(x),
        None => json!(""),
    }
}

pub fn read_summary(path: &str) -> AppResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    debug!("read_summary: read {} bytes", contents.len());
    serde_json::from_str(contents.as_str()).context(ParsingReferenceSnafu {})
}

/// Runs the whole program: bootstrap, render, optional summary output and
/// optional reference check.
pub fn run_app(args: &Args) -> AppResult<()> {
    let mut app = App::new(AppOptions::from_args(args));
    let rendered = app.start()?;
    print!("{}", rendered);

    if args.out.is_none() && args.reference.is_none() {
        return Ok(());
    }

    let summary = build_summary_js(&app.contests);
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingDatasetSnafu {})?;

    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty),
        Some(path) => {
            fs::write(path, &pretty).context(WritingSummarySnafu { path })?;
            info!("run_app: summary written to {}", path);
        }
        None => {}
    }

    if let Some(ref_path) = args.reference.as_deref() {
        let reference = read_summary(ref_path)?;
        let pretty_ref =
            serde_json::to_string_pretty(&reference).context(ParsingReferenceSnafu {})?;
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
            whatever!("Difference detected between computed summary and reference summary");
        }
        info!("run_app: summary matches the reference");
    }

    Ok(())
}
