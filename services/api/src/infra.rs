use metrics_exporter_prometheus::PrometheusHandle;
use mosfet_screener::screening::{
    ModelRegistry, PredictedProperties, PredictionError, PropertyPredictor,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Registry key for the bundled predictor; bump when the table changes.
pub(crate) const PREDICTOR_MODEL_KEY: &str = "tabulated-v1";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Demo-grade structure-inference capability: parses just enough CIF to
/// identify the compound, then serves tabulated properties. Deployments
/// with a real inference backend provide their own `PropertyPredictor`.
pub(crate) struct TabulatedPropertyPredictor {
    entries: HashMap<String, PredictedProperties>,
}

impl TabulatedPropertyPredictor {
    pub(crate) fn standard() -> Self {
        let mut entries = HashMap::new();
        let mut add = |formula: &str, bandgap: f64, permittivity: f64, formation_energy: f64| {
            entries.insert(
                formula.to_string(),
                PredictedProperties {
                    bandgap,
                    formation_energy,
                    permittivity,
                },
            );
        };
        add("Si", 1.12, 11.7, 0.0);
        add("Ge", 0.66, 16.0, 0.0);
        add("GaAs", 1.42, 12.9, -0.37);
        add("SiC", 3.26, 9.7, -0.64);
        add("GaN", 3.39, 8.9, -1.17);
        add("MoS2", 1.8, 7.1, -0.45);
        Self { entries }
    }
}

impl PropertyPredictor for TabulatedPropertyPredictor {
    fn predict(&self, structure_text: &str) -> Result<PredictedProperties, PredictionError> {
        let formula = parse_cif_formula(structure_text)?;
        self.entries.get(&formula).copied().ok_or_else(|| {
            PredictionError::Inference(format!("no tabulated properties for formula '{formula}'"))
        })
    }
}

/// Builds (once) and returns the predictor handle from the registry.
pub(crate) fn tabulated_predictor(
    registry: &ModelRegistry<TabulatedPropertyPredictor>,
) -> Result<Arc<TabulatedPropertyPredictor>, PredictionError> {
    registry.get_or_create(PREDICTOR_MODEL_KEY, || {
        Ok(TabulatedPropertyPredictor::standard())
    })
}

/// Extracts a chemical formula from CIF text: the `_chemical_formula_sum`
/// or `_chemical_formula_structural` tag when present, else the `data_`
/// block name. Whitespace and quotes are stripped, so `'Ga As'` and
/// `GaAs` identify the same compound.
fn parse_cif_formula(structure_text: &str) -> Result<String, PredictionError> {
    if structure_text.trim().is_empty() {
        return Err(PredictionError::InvalidStructure(
            "structure text is empty".to_string(),
        ));
    }

    let mut block_name: Option<String> = None;
    let mut formula: Option<String> = None;

    for line in structure_text.lines() {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("data_") {
            block_name.get_or_insert_with(|| name.trim().to_string());
            continue;
        }
        for tag in ["_chemical_formula_sum", "_chemical_formula_structural"] {
            if let Some(rest) = line.strip_prefix(tag) {
                let cleaned = clean_formula(rest);
                if !cleaned.is_empty() {
                    formula.get_or_insert(cleaned);
                }
            }
        }
    }

    let Some(block_name) = block_name else {
        return Err(PredictionError::InvalidStructure(
            "no data_ block found".to_string(),
        ));
    };

    let formula = formula.unwrap_or_else(|| clean_formula(&block_name));
    if formula.is_empty() {
        return Err(PredictionError::InvalidStructure(
            "data block carries no chemical formula".to_string(),
        ));
    }
    Ok(formula)
}

fn clean_formula(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '"')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_tag_wins_over_block_name() {
        let cif = "data_struct_0001\n_chemical_formula_sum 'Ga As'\n_cell_length_a 5.65\n";
        assert_eq!(parse_cif_formula(cif).expect("parses"), "GaAs");
    }

    #[test]
    fn block_name_is_the_fallback_formula() {
        let cif = "data_Si\n_cell_length_a 5.431\n";
        assert_eq!(parse_cif_formula(cif).expect("parses"), "Si");
    }

    #[test]
    fn text_without_data_block_is_invalid() {
        let err = parse_cif_formula("just some prose").expect_err("rejected");
        assert!(matches!(err, PredictionError::InvalidStructure(_)));
    }

    #[test]
    fn tabulated_lookup_round_trips() {
        let predictor = TabulatedPropertyPredictor::standard();
        let properties = predictor
            .predict("data_x\n_chemical_formula_sum 'Mo S2'\n")
            .expect("MoS2 tabulated");
        assert_eq!(properties.bandgap, 1.8);

        let err = predictor
            .predict("data_Unobtainium\n")
            .expect_err("unknown formula");
        assert!(matches!(err, PredictionError::Inference(_)));
    }

    #[test]
    fn registry_returns_the_same_handle() {
        let registry = ModelRegistry::new();
        let first = tabulated_predictor(&registry).expect("builds");
        let second = tabulated_predictor(&registry).expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
