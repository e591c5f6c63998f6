use super::domain::{
    PercentileScores, DIBL_PERCENT, FT_PERCENT, GM_PERCENT, IOFF_PERCENT, ION_PERCENT,
    R0_PERCENT, SS_PERCENT, STAB_PERCENT, VTH_SCORE_PERCENT,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fixed display priority. Metrics listed here come first in this order;
/// anything else the capability reports is appended in encounter order.
pub const PRIORITY: [&str; 9] = [
    ION_PERCENT,
    GM_PERCENT,
    FT_PERCENT,
    VTH_SCORE_PERCENT,
    SS_PERCENT,
    DIBL_PERCENT,
    R0_PERCENT,
    IOFF_PERCENT,
    STAB_PERCENT,
];

/// Short display label for a percentile key. Unknown keys fall back to the
/// key itself.
pub fn display_label(key: &str) -> &str {
    match key {
        SS_PERCENT => "SS",
        VTH_SCORE_PERCENT => "Vth score",
        ION_PERCENT => "Ion",
        IOFF_PERCENT => "Ioff",
        GM_PERCENT => "gm",
        FT_PERCENT => "fT",
        R0_PERCENT => "r0",
        DIBL_PERCENT => "DIBL",
        STAB_PERCENT => "Stability",
        other => other,
    }
}

/// One row of the ranked display, highest candidate percentile first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub key: String,
    pub label: String,
    pub value: f64,
}

/// Chart-ready comparison of the candidate against the baselines: ranked
/// candidate rows, the untouched baseline overlay, and the reference key
/// used for the baseline legend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingView {
    pub entries: Vec<RankingEntry>,
    pub baseline_percentiles: BTreeMap<String, PercentileScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_key: Option<String>,
}

/// Orders the candidate's percentiles (priority list, then encounter order)
/// and re-sorts by descending value with a stable sort, so ties keep their
/// priority order. The baseline mapping passes through unchanged.
pub fn assemble(
    candidate: &PercentileScores,
    baselines: &BTreeMap<String, PercentileScores>,
) -> RankingView {
    let mut ordered: Vec<&str> = PRIORITY
        .iter()
        .copied()
        .filter(|key| candidate.contains_key(key))
        .collect();
    ordered.extend(candidate.keys().filter(|key| !PRIORITY.contains(key)));

    let mut entries: Vec<RankingEntry> = ordered
        .into_iter()
        .filter_map(|key| {
            candidate.get(key).map(|value| RankingEntry {
                key: key.to_string(),
                label: display_label(key).to_string(),
                value,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    let reference_key = if baselines.values().any(|scores| scores.contains_key(ION_PERCENT)) {
        Some(ION_PERCENT.to_string())
    } else {
        entries.first().map(|entry| entry.key.clone())
    };

    RankingView {
        entries,
        baseline_percentiles: baselines.clone(),
        reference_key,
    }
}
