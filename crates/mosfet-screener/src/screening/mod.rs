//! Candidate-material screening pipeline: parameter resolution, metrics and
//! percentile acquisition, aggregate scoring, ranking assembly, and the
//! response envelope. Pure and stateless per request; the device-physics
//! and structure-inference capabilities are injected behind traits.

mod baselines;
pub mod domain;
mod envelope;
mod gateway;
mod import;
pub mod ranking;
mod registry;
mod resolver;
mod scorer;
mod structure;

pub use baselines::{BaselineMaterial, BaselineSet};
pub use envelope::{ResolvedInputs, ScreeningResult, MODEL_VERSION, REPORTED_METRICS};
pub use gateway::{
    BaselineEvaluation, DeviceModel, MaterialEvaluation, MetricsGateway, ModelError,
};
pub use import::{MaterialCsvImporter, NamedCandidate};
pub use ranking::{RankingEntry, RankingView};
pub use registry::ModelRegistry;
pub use resolver::{
    resolve, CandidateProperties, ScreeningConditions, REQUIRED_MATERIAL_KEYS,
};
pub use scorer::{
    suitability_score, Decision, SUITABLE_THRESHOLD, UNSURE_THRESHOLD, WEIGHTED_FIELDS,
};
pub use structure::{PredictedProperties, PredictionError, PropertyPredictor};

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error(
        "missing required material properties [{}]; required keys: {}",
        .missing.join(", "),
        REQUIRED_MATERIAL_KEYS.join(", ")
    )]
    MissingInput { missing: Vec<String> },
    #[error("candidate metrics computation failed")]
    Candidate(#[source] ModelError),
    #[error("structure property inference failed")]
    Structure(#[source] PredictionError),
}

/// Facade running the full screening pipeline against an injected
/// device-physics capability and a fixed baseline table.
pub struct ScreeningService<M> {
    model: Arc<M>,
    baselines: BaselineSet,
}

impl<M: DeviceModel> ScreeningService<M> {
    pub fn new(model: Arc<M>, baselines: BaselineSet) -> Self {
        Self { model, baselines }
    }

    pub fn baselines(&self) -> &BaselineSet {
        &self.baselines
    }

    /// Screens a candidate given raw properties and request conditions.
    pub fn screen(
        &self,
        props: &CandidateProperties,
        conditions: &ScreeningConditions,
    ) -> Result<ScreeningResult, ScreeningError> {
        let (material, process) = resolver::resolve(props, conditions)?;
        self.run(material, process, false)
    }

    /// Screens from structure text: the predictor supplies the material
    /// triple, then the standard pipeline runs. The envelope echoes the
    /// resolved inputs on this path.
    pub fn screen_structure<P: PropertyPredictor>(
        &self,
        predictor: &P,
        structure_text: &str,
        conditions: &ScreeningConditions,
    ) -> Result<ScreeningResult, ScreeningError> {
        let predicted = predictor
            .predict(structure_text)
            .map_err(ScreeningError::Structure)?;
        let props = CandidateProperties::material(
            predicted.bandgap,
            predicted.permittivity,
            predicted.formation_energy,
        );
        let (material, process) = resolver::resolve(&props, conditions)?;
        self.run(material, process, true)
    }

    fn run(
        &self,
        material: domain::MaterialInputs,
        process: domain::ProcessParameters,
        echo_inputs: bool,
    ) -> Result<ScreeningResult, ScreeningError> {
        let gateway = MetricsGateway::new(self.model.as_ref());

        let candidate = gateway
            .evaluate(&material, &process)
            .map_err(ScreeningError::Candidate)?;

        let mut baseline_percentiles = BTreeMap::new();
        for evaluation in gateway.evaluate_baselines(&self.baselines, &process) {
            match evaluation.outcome {
                Ok(scores) => {
                    baseline_percentiles.insert(evaluation.name, scores);
                }
                Err(error) => {
                    warn!(baseline = %evaluation.name, %error, "baseline evaluation dropped");
                }
            }
        }

        let score = scorer::suitability_score(&candidate.percentiles);
        let decision = Decision::classify(score);
        let inputs = echo_inputs.then_some(ResolvedInputs { material, process });

        Ok(envelope::assemble(
            candidate,
            baseline_percentiles,
            score,
            decision,
            inputs,
        ))
    }
}
