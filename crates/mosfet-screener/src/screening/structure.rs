use serde::{Deserialize, Serialize};

/// Output contract of the structure-to-property inference capability.
/// Field names follow the upstream predictor's response keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedProperties {
    pub bandgap: f64,
    pub formation_energy: f64,
    pub permittivity: f64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PredictionError {
    #[error("structure text could not be parsed: {0}")]
    InvalidStructure(String),
    #[error("property inference failed: {0}")]
    Inference(String),
}

/// Crystal-structure-to-material-property inference capability, reached
/// only through the structure-driven entry point. Implementations are
/// expected to be memoized externally (see `ModelRegistry`).
pub trait PropertyPredictor {
    fn predict(&self, structure_text: &str) -> Result<PredictedProperties, PredictionError>;
}
