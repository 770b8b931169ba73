//! Text rendering of distributions and summaries.
//!
//! Tables are ASCII, formatted with the [`tabled`] crate.

use crate::group::PairwiseReport;
use crate::hist::Hist;
use crate::pmf::Pmf;
use tabled::{Table, Tabled};

/// One PMF entry as displayed.
#[derive(Debug, Clone, Tabled)]
pub struct PmfRow {
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Probability")]
    pub probability: String,
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl PmfRow {
    pub fn new(value: f64, probability: f64) -> Self {
        Self {
            value: format_value(value),
            probability: format!("{probability:.6}"),
            percentage: format!("{:.2}%", probability * 100.0),
        }
    }
}

/// One value count as displayed.
#[derive(Debug, Clone, Tabled)]
pub struct CountRow {
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// Renders a PMF as a table, optionally under an underlined title.
pub fn pmf_table(pmf: &Pmf, title: Option<&str>) -> String {
    if pmf.is_empty() {
        return "No data available".to_string();
    }
    let rows: Vec<PmfRow> = pmf.iter().map(|(x, p)| PmfRow::new(x, p)).collect();
    with_title(Table::new(rows).to_string(), title)
}

/// Renders value counts as a table, optionally under an underlined title.
pub fn hist_table(hist: &Hist, title: Option<&str>) -> String {
    if hist.is_empty() {
        return "No data available".to_string();
    }
    let rows: Vec<CountRow> = hist
        .iter()
        .map(|(value, count)| CountRow {
            value: format_value(value),
            count,
        })
        .collect();
    with_title(Table::new(rows).to_string(), title)
}

/// Summary lines for the pairwise-difference statistic.
pub fn format_summary(report: &PairwiseReport) -> String {
    let summary = &report.summary;
    format!(
        "Mean difference between pairs {}\n\
         Differences: {} from {} respondents\n\
         PMF mean {:.6}, variance {:.6}",
        summary.mean,
        summary.count,
        report.qualifying_groups,
        summary.pmf.mean(),
        summary.pmf.variance()
    )
}

fn with_title(table: String, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), table),
        None => table,
    }
}

/// Integral values print without a fractional part.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
