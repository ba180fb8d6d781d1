// ********* Input data structures ***********

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JSValue;

/// One row of the source dataset, exactly as published.
///
/// The money fields are either a number or the empty string in the source
/// JSON; the empty string means the candidate has not reported for that
/// period. `from` and `to` are either both filled or both empty.
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct FinancialRecord {
    pub contest: String,
    #[serde(deserialize_with = "read_label")]
    pub interval: String,
    pub candidate: String,
    #[serde(default)]
    pub incumbent: String,
    pub party: String,
    #[serde(deserialize_with = "read_amount")]
    pub amountraised: Option<f64>,
    #[serde(deserialize_with = "read_amount")]
    pub cashonhand: Option<f64>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub reporturl: String,
    #[serde(rename = "rowNumber")]
    pub row_number: u64,
}

impl FinancialRecord {
    /// True when the record carries no usable reporting-period bounds.
    pub fn has_interval_bounds(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty()
    }
}

// Interval labels appear both as strings ("Year-end") and as bare years (2013).
fn read_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JSValue::deserialize(deserializer)?;
    match v {
        JSValue::String(s) => Ok(s),
        JSValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number label, got {:?}",
            other
        ))),
    }
}

fn read_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JSValue::deserialize(deserializer)?;
    match v {
        JSValue::Number(n) => Ok(n.as_f64()),
        JSValue::String(s) if s.is_empty() => Ok(None),
        JSValue::String(s) => Ok(s.parse::<f64>().ok()),
        JSValue::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected a number or empty string, got {:?}",
            other
        ))),
    }
}

/// Parses the US-style `M/D/YYYY` date strings used by the dataset.
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

// ******** View-model structures *********

/// One reporting period within a contest.
#[derive(PartialEq, Debug, Clone)]
pub struct Interval {
    /// Slug of the label, unique within a contest.
    pub id: String,
    /// The label exactly as it appears in the source, used for display and
    /// for matching candidates to their period.
    pub name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// One candidate line of a contest. Wraps the raw record and exposes a
/// uniform by-name accessor so a renderer does not need to know the struct.
#[derive(PartialEq, Debug, Clone)]
pub struct Candidate {
    record: FinancialRecord,
}

impl Candidate {
    pub fn new(record: FinancialRecord) -> Candidate {
        Candidate { record }
    }

    pub fn record(&self) -> &FinancialRecord {
        &self.record
    }

    pub fn amount_raised(&self) -> Option<f64> {
        self.record.amountraised
    }

    pub fn cash_on_hand(&self) -> Option<f64> {
        self.record.cashonhand
    }

    /// Reads a field by its source name. Unknown names and unreported money
    /// values yield `None`.
    pub fn get(&self, field: &str) -> Option<String> {
        match field {
            "contest" => Some(self.record.contest.clone()),
            "interval" => Some(self.record.interval.clone()),
            "candidate" => Some(self.record.candidate.clone()),
            "incumbent" => Some(self.record.incumbent.clone()),
            "party" => Some(self.record.party.clone()),
            "amountraised" => self.record.amountraised.map(|v| v.to_string()),
            "cashonhand" => self.record.cashonhand.map(|v| v.to_string()),
            "from" => Some(self.record.from.clone()),
            "to" => Some(self.record.to.clone()),
            "reporturl" => Some(self.record.reporturl.clone()),
            "rowNumber" => Some(self.record.row_number.to_string()),
            _ => None,
        }
    }
}

/// A single race, aggregating its candidates and reporting periods.
///
/// `current_interval` is the only field that changes after construction. It
/// starts on the most recent interval and moves when the user picks another
/// period.
#[derive(PartialEq, Debug, Clone)]
pub struct Contest {
    pub id: String,
    pub name: String,
    /// Sorted by `to` date, most recent first.
    pub intervals: Vec<Interval>,
    /// `None` when no record of the contest carried period bounds.
    pub current_interval: Option<Interval>,
    /// Every record of the contest, across all periods, ordered by amount
    /// raised descending.
    pub candidates: Vec<Candidate>,
}

impl Contest {
    /// Switches the current reporting period to the interval with the given
    /// slug. Returns false (and leaves the contest untouched) when the slug
    /// does not name one of this contest's intervals.
    pub fn set_current_interval(&mut self, id: &str) -> bool {
        match self.intervals.iter().find(|iv| iv.id == id) {
            Some(iv) => {
                self.current_interval = Some(iv.clone());
                true
            }
            None => false,
        }
    }

    /// The candidates reporting in the current interval, in display order.
    pub fn current_candidates(&self) -> Vec<&Candidate> {
        match &self.current_interval {
            Some(iv) => self
                .candidates
                .iter()
                .filter(|c| c.record().interval == iv.name)
                .collect(),
            None => Vec::new(),
        }
    }
}
