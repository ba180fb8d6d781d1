//! Campaign-finance contest view models.
//!
//! The input is a flat list of financial records (one per candidate and
//! reporting period). This crate reshapes it into [`Contest`] view models:
//! one per race, each holding its reporting [`Interval`]s sorted most recent
//! first and its [`Candidate`]s sorted by money raised.

mod format;
mod model;

use log::{debug, info};
use serde_json::Value as JSValue;

pub use crate::format::*;
pub use crate::model::*;

/// Where the records live inside the dataset document.
///
/// Published datasets come in two shapes: the records directly under the
/// title key, or nested one level deeper under a sheet key. The loader tries
/// the nested shape first and falls back to the flat one.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct DatasetOptions {
    pub title: String,
    pub sheet: Option<String>,
}

impl DatasetOptions {
    pub fn new(title: &str, sheet: Option<&str>) -> DatasetOptions {
        DatasetOptions {
            title: title.to_string(),
            sheet: sheet.map(|s| s.to_string()),
        }
    }
}

/// Pulls the financial records out of a parsed dataset document.
///
/// A document without the expected title (or sheet) yields no records. That
/// is the "no data available" outcome, not an error. Rows that do not parse
/// as records are skipped.
pub fn extract_records(doc: &JSValue, opts: &DatasetOptions) -> Vec<FinancialRecord> {
    let titled = match doc.get(opts.title.as_str()) {
        Some(v) => v,
        None => {
            info!(
                "extract_records: no {:?} key in the dataset, producing no records",
                opts.title
            );
            return Vec::new();
        }
    };

    let rows = opts
        .sheet
        .as_ref()
        .and_then(|sheet| titled.get(sheet.as_str()))
        .and_then(JSValue::as_array)
        .or_else(|| titled.as_array());
    let rows = match rows {
        Some(r) => r,
        None => {
            info!(
                "extract_records: {:?} holds neither a sheet nor a record array",
                opts.title
            );
            return Vec::new();
        }
    };

    let mut records: Vec<FinancialRecord> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        match serde_json::from_value::<FinancialRecord>(row.clone()) {
            Ok(r) => records.push(r),
            Err(e) => {
                debug!("extract_records: skipping row {}: {}", idx, e);
            }
        }
    }
    info!("extract_records: {} records", records.len());
    records
}

/// Groups records into contests and builds the view models.
///
/// Contests come out in first-occurrence order of the contest name. The
/// grouping is an explicit ordered association, so the ordering is a property
/// of the data structure and not of some map's iteration order.
pub fn load_contests(records: Vec<FinancialRecord>) -> Vec<Contest> {
    let mut groups: Vec<(String, Vec<FinancialRecord>)> = Vec::new();
    for r in records {
        match groups.iter_mut().find(|(name, _)| *name == r.contest) {
            Some((_, rows)) => rows.push(r),
            None => groups.push((r.contest.clone(), vec![r])),
        }
    }
    info!("load_contests: {} contests", groups.len());

    groups
        .into_iter()
        .map(|(name, rows)| build_contest(name, rows))
        .collect()
}

/// One-call pipeline: document in, contest view models out.
pub fn load_data(doc: &JSValue, opts: &DatasetOptions) -> Vec<Contest> {
    load_contests(extract_records(doc, opts))
}

fn build_contest(name: String, rows: Vec<FinancialRecord>) -> Contest {
    // Interval map keyed by slug, in first-sight order. A repeated label
    // overwrites the stored bounds (last write wins, as in the source data).
    let mut by_slug: Vec<(String, Interval)> = Vec::new();
    for r in rows.iter() {
        if !r.has_interval_bounds() {
            continue;
        }
        let (from, to) = match (parse_report_date(&r.from), parse_report_date(&r.to)) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                debug!(
                    "build_contest: unparseable bounds {:?}..{:?} on row {}",
                    r.from, r.to, r.row_number
                );
                continue;
            }
        };
        let id = identifier(&r.interval);
        let interval = Interval {
            id: id.clone(),
            name: r.interval.clone(),
            from,
            to,
        };
        match by_slug.iter_mut().find(|(slug, _)| *slug == id) {
            Some((_, existing)) => *existing = interval,
            None => by_slug.push((id, interval)),
        }
    }

    let mut intervals: Vec<Interval> = by_slug.into_iter().map(|(_, iv)| iv).collect();
    // Most recent reporting period first.
    intervals.sort_by(|a, b| b.to.cmp(&a.to));
    let current_interval = intervals.first().cloned();

    let mut candidates: Vec<Candidate> = rows.into_iter().map(Candidate::new).collect();
    // Unreported amounts order as zero, matching the source ordering.
    candidates.sort_by(|a, b| {
        let av = a.amount_raised().unwrap_or(0.0);
        let bv = b.amount_raised().unwrap_or(0.0);
        bv.partial_cmp(&av).unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        "build_contest: {:?}: {} intervals, {} candidates, current {:?}",
        name,
        intervals.len(),
        candidates.len(),
        current_interval.as_ref().map(|iv| iv.id.as_str())
    );
    Contest {
        id: identifier(&name),
        name,
        intervals,
        current_interval,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(
        contest: &str,
        interval: &str,
        candidate: &str,
        amount: JSValue,
        from: &str,
        to: &str,
        row: u64,
    ) -> JSValue {
        json!({
            "contest": contest,
            "interval": interval,
            "candidate": candidate,
            "incumbent": "",
            "party": "D",
            "amountraised": amount,
            "cashonhand": "",
            "from": from,
            "to": to,
            "reporturl": "",
            "rowNumber": row
        })
    }

    fn fixture_doc() -> JSValue {
        json!({
            "2014 Campaign Finances": {
                "Sheet1": [
                    record("Governor", "Year-end", "Mark Dayton", json!(3370625.57),
                           "1/1/2013", "12/31/2013", 2),
                    record("Governor", "Year-end", "Jeff Johnson", json!(2466177.47),
                           "1/1/2013", "12/31/2013", 3),
                    record("Governor", "Pre-general", "Mark Dayton", json!(912345.0),
                           "9/1/2013", "10/20/2013", 4),
                    record("Attorney General", "Year-end", "Lori Swanson", json!(244331.0),
                           "1/1/2013", "12/31/2013", 5),
                    record("Governor", "Year-end", "Hannah Nicollet", json!(""),
                           "", "", 6),
                ]
            }
        })
    }

    #[test]
    fn nested_and_flat_shapes_agree() {
        let nested = fixture_doc();
        let rows = nested["2014 Campaign Finances"]["Sheet1"].clone();
        let flat = json!({ "2014 Campaign Finances": rows });

        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let from_nested = extract_records(&nested, &opts);
        let from_flat = extract_records(&flat, &opts);
        assert_eq!(from_nested.len(), 5);
        assert_eq!(from_nested, from_flat);
    }

    #[test]
    fn missing_title_yields_no_contests() {
        let doc = json!({ "Some Other Dataset": [] });
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let contests = load_data(&doc, &opts);
        assert!(contests.is_empty());
    }

    #[test]
    fn contests_keep_first_occurrence_order() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let contests = load_data(&fixture_doc(), &opts);
        let names: Vec<&str> = contests.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Governor", "Attorney General"]);
    }

    #[test]
    fn grouping_keeps_every_record() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let records = extract_records(&fixture_doc(), &opts);
        let total = records.len();
        let mut rows_in: Vec<u64> = records.iter().map(|r| r.row_number).collect();

        let contests = load_contests(records);
        let mut rows_out: Vec<u64> = contests
            .iter()
            .flat_map(|c| c.candidates.iter().map(|cd| cd.record().row_number))
            .collect();
        assert_eq!(rows_out.len(), total);
        rows_in.sort_unstable();
        rows_out.sort_unstable();
        assert_eq!(rows_in, rows_out);
    }

    #[test]
    fn intervals_sorted_most_recent_first() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let contests = load_data(&fixture_doc(), &opts);
        let governor = &contests[0];
        assert_eq!(governor.intervals.len(), 2);
        for w in governor.intervals.windows(2) {
            assert!(w[0].to >= w[1].to);
        }
        assert_eq!(governor.intervals[0].name, "Year-end");
        assert_eq!(
            governor.current_interval,
            Some(governor.intervals[0].clone())
        );
    }

    #[test]
    fn candidates_ordered_by_amount_with_missing_last() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let contests = load_data(&fixture_doc(), &opts);
        let amounts: Vec<f64> = contests[0]
            .candidates
            .iter()
            .map(|c| c.amount_raised().unwrap_or(0.0))
            .collect();
        for w in amounts.windows(2) {
            assert!(w[0] >= w[1]);
        }
        let last = contests[0].candidates.last().unwrap();
        assert_eq!(last.amount_raised(), None);
    }

    #[test]
    fn governor_end_to_end() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let contests = load_data(&fixture_doc(), &opts);
        let governor = &contests[0];
        assert_eq!(governor.name, "Governor");
        assert_eq!(governor.id, "governor");
        assert_eq!(
            governor.current_interval.as_ref().map(|iv| iv.name.as_str()),
            Some("Year-end")
        );
        assert_eq!(
            governor.candidates[0].get("candidate"),
            Some("Mark Dayton".to_string())
        );
        // The interval filter uses the verbatim label.
        let visible = governor.current_candidates();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0].get("candidate"), Some("Mark Dayton".to_string()));
    }

    #[test]
    fn contest_without_dated_records_has_no_current_interval() {
        let doc = json!({
            "2014 Campaign Finances": [
                record("Supreme Court", "Year-end", "A. Jurist", json!(1000.0), "", "", 2),
            ]
        });
        let opts = DatasetOptions::new("2014 Campaign Finances", None);
        let contests = load_data(&doc, &opts);
        assert_eq!(contests.len(), 1);
        assert!(contests[0].intervals.is_empty());
        assert_eq!(contests[0].current_interval, None);
        assert_eq!(contests[0].candidates.len(), 1);
        assert!(contests[0].current_candidates().is_empty());
    }

    #[test]
    fn repeated_interval_label_keeps_last_bounds() {
        let doc = json!({
            "2014 Campaign Finances": [
                record("Governor", "Year-end", "Mark Dayton", json!(2.0),
                       "1/1/2013", "12/31/2013", 2),
                record("Governor", "Year-end", "Jeff Johnson", json!(1.0),
                       "1/1/2013", "11/30/2013", 3),
            ]
        });
        let opts = DatasetOptions::new("2014 Campaign Finances", None);
        let contests = load_data(&doc, &opts);
        assert_eq!(contests[0].intervals.len(), 1);
        // The second record overwrote the bounds of the shared label.
        assert_eq!(
            contests[0].intervals[0].to,
            chrono::NaiveDate::from_ymd_opt(2013, 11, 30).unwrap()
        );
    }

    #[test]
    fn unparseable_dates_do_not_crash() {
        let doc = json!({
            "2014 Campaign Finances": [
                record("Governor", "Year-end", "Mark Dayton", json!(2.0),
                       "sometime", "later", 2),
            ]
        });
        let opts = DatasetOptions::new("2014 Campaign Finances", None);
        let contests = load_data(&doc, &opts);
        assert!(contests[0].intervals.is_empty());
        assert_eq!(contests[0].candidates.len(), 1);
    }

    #[test]
    fn switching_intervals() {
        let opts = DatasetOptions::new("2014 Campaign Finances", Some("Sheet1"));
        let mut contests = load_data(&fixture_doc(), &opts);
        let governor = &mut contests[0];
        assert!(governor.set_current_interval("pre-general"));
        assert_eq!(
            governor.current_interval.as_ref().map(|iv| iv.name.as_str()),
            Some("Pre-general")
        );
        assert_eq!(governor.current_candidates().len(), 1);
        assert!(!governor.set_current_interval("q9-2099"));
        assert_eq!(
            governor.current_interval.as_ref().map(|iv| iv.name.as_str()),
            Some("Pre-general")
        );
    }
}
