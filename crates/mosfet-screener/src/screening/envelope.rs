use super::domain::{
    MaterialInputs, PercentileScores, ProcessParameters, RawMetrics, DIBL_MV_PER_V, FT_HZ,
    GM_S_PER_UM, IOFF_PROXY, ION_A_PER_UM, R0_OHM_PER_UM, SS_MVDEC, STAB_SCORE, VTH_V,
};
use super::gateway::MaterialEvaluation;
use super::scorer::Decision;
use serde::Serialize;
use std::collections::BTreeMap;

/// Version tag reported in every envelope for diagnostics.
pub const MODEL_VERSION: &str = "screener_v1";

/// Raw metrics exposed in the response, in reporting order. The capability
/// may compute more; the envelope carries exactly this subset.
pub const REPORTED_METRICS: [&str; 9] = [
    SS_MVDEC,
    VTH_V,
    ION_A_PER_UM,
    GM_S_PER_UM,
    FT_HZ,
    R0_OHM_PER_UM,
    DIBL_MV_PER_V,
    STAB_SCORE,
    IOFF_PROXY,
];

/// Echo of the fully resolved parameters, attached on the structure-driven
/// path for display and audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedInputs {
    pub material: MaterialInputs,
    pub process: ProcessParameters,
}

/// The screening response contract. Constructed once per request and
/// immutable afterwards; `uncertainty` is a reserved placeholder and is
/// always 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub metrics: RawMetrics,
    pub percentiles: PercentileScores,
    pub baseline_percentiles: BTreeMap<String, PercentileScores>,
    pub score: f64,
    pub decision: Decision,
    pub uncertainty: f64,
    pub model_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ResolvedInputs>,
}

/// Packages the pipeline outputs. Pure assembly; the only transformation is
/// restricting raw metrics to the reported subset.
pub(crate) fn assemble(
    candidate: MaterialEvaluation,
    baseline_percentiles: BTreeMap<String, PercentileScores>,
    score: f64,
    decision: Decision,
    inputs: Option<ResolvedInputs>,
) -> ScreeningResult {
    let metrics = REPORTED_METRICS
        .iter()
        .filter_map(|key| candidate.metrics.get(key).map(|value| (*key, value)))
        .collect();

    ScreeningResult {
        metrics,
        percentiles: candidate.percentiles,
        baseline_percentiles,
        score,
        decision,
        uncertainty: 0.0,
        model_version: MODEL_VERSION,
        inputs,
    }
}
