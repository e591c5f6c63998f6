use super::baselines::BaselineSet;
use super::domain::{MaterialInputs, PercentileScores, ProcessParameters, RawMetrics};

/// Device-physics capability. Both operations must be pure functions of
/// their inputs; the pipeline passes values through without recomputing or
/// validating magnitudes.
pub trait DeviceModel {
    fn compute_metrics(
        &self,
        material: &MaterialInputs,
        process: &ProcessParameters,
    ) -> Result<RawMetrics, ModelError>;

    fn compute_percentiles(&self, metrics: &RawMetrics) -> Result<PercentileScores, ModelError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}

/// Metrics plus their normalized percentile scores for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEvaluation {
    pub metrics: RawMetrics,
    pub percentiles: PercentileScores,
}

/// Outcome of evaluating one baseline. Failures stay attached to the
/// baseline that produced them; consumers keep the success variants.
#[derive(Debug, Clone)]
pub struct BaselineEvaluation {
    pub name: String,
    pub outcome: Result<PercentileScores, ModelError>,
}

/// Thin front over the device-physics capability that runs the
/// metrics-then-percentiles sequence for one material at a time.
pub struct MetricsGateway<'a, M: DeviceModel> {
    model: &'a M,
}

impl<'a, M: DeviceModel> MetricsGateway<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Evaluates a single material. Errors propagate: the caller decides
    /// whether the material was the candidate (fatal) or a baseline.
    pub fn evaluate(
        &self,
        material: &MaterialInputs,
        process: &ProcessParameters,
    ) -> Result<MaterialEvaluation, ModelError> {
        let metrics = self.model.compute_metrics(material, process)?;
        let percentiles = self.model.compute_percentiles(&metrics)?;
        Ok(MaterialEvaluation {
            metrics,
            percentiles,
        })
    }

    /// Evaluates every baseline under the candidate's process parameters,
    /// returning one result per entry in table order.
    pub fn evaluate_baselines(
        &self,
        baselines: &BaselineSet,
        process: &ProcessParameters,
    ) -> Vec<BaselineEvaluation> {
        baselines
            .iter()
            .map(|baseline| BaselineEvaluation {
                name: baseline.name.clone(),
                outcome: self
                    .evaluate(&baseline.inputs, process)
                    .map(|evaluation| evaluation.percentiles),
            })
            .collect()
    }
}
