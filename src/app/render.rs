// Text rendering of the contest view models: one table per contest for the
// current reporting period, plus an optional bar chart of money raised.

use campaign_finance::{format_currency, Candidate, Contest};
use log::debug;

const CHART_WIDTH: usize = 40;

/// Renders the contest overview. Only the candidates of each contest's
/// current interval are shown; the full collections stay untouched.
pub fn contest_overview(contests: &[Contest], disable_charts: bool) -> String {
    if contests.is_empty() {
        return "no contests to display\n".to_string();
    }
    let mut out = String::new();
    for contest in contests {
        out.push_str(&contest_section(contest, disable_charts));
        out.push('\n');
    }
    out
}

fn contest_section(contest: &Contest, disable_charts: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", contest.name));

    let current = match &contest.current_interval {
        Some(iv) => iv,
        None => {
            debug!("contest_section: {} has no current interval", contest.id);
            out.push_str("  no reporting data available\n");
            return out;
        }
    };

    let periods: Vec<String> = contest
        .intervals
        .iter()
        .map(|iv| {
            if iv.id == current.id {
                format!("[{}]", iv.name)
            } else {
                iv.name.clone()
            }
        })
        .collect();
    out.push_str(&format!(
        "Reporting period: {} ({} - {})\n",
        periods.join("  "),
        current.from.format("%-m/%-d/%Y"),
        current.to.format("%-m/%-d/%Y"),
    ));

    let visible = contest.current_candidates();
    out.push_str(&format!(
        "{:<24} {:<6} {:<10} {:>15} {:>15}\n",
        "Candidate", "Party", "Incumbent", "Amount raised", "Cash on hand"
    ));
    for candidate in visible.iter() {
        let r = candidate.record();
        out.push_str(&format!(
            "{:<24} {:<6} {:<10} {:>15} {:>15}\n",
            r.candidate,
            r.party,
            if r.incumbent == "Y" { "yes" } else { "" },
            money(r.amountraised),
            money(r.cashonhand),
        ));
    }

    if !disable_charts {
        out.push_str(&chart(&visible));
    }
    out
}

/// ASCII bar chart of amount raised, scaled to the period's maximum.
fn chart(candidates: &[&Candidate]) -> String {
    let max = candidates
        .iter()
        .filter_map(|c| c.amount_raised())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return String::new();
    }
    let mut out = String::new();
    for candidate in candidates {
        let amount = candidate.amount_raised().unwrap_or(0.0);
        let width = ((amount / max) * CHART_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:<24} {}\n",
            candidate.record().candidate,
            "#".repeat(width)
        ));
    }
    out
}

fn money(v: Option<f64>) -> String {
    match v {
        Some(x) => format_currency(x),
        None => "(no data)".to_string(),
    }
}
