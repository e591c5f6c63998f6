//! Structure-driven entry point: predicted properties feed the same
//! pipeline, the envelope echoes the resolved inputs, and unparseable
//! structures fail fast.

mod common {
    use mosfet_screener::screening::domain::{
        MaterialInputs, PercentileScores, ProcessParameters, RawMetrics, FT_PERCENT, GM_PERCENT,
        ION_PERCENT, VTH_SCORE_PERCENT, VTH_V,
    };
    use mosfet_screener::screening::{
        DeviceModel, ModelError, PredictedProperties, PredictionError, PropertyPredictor,
    };

    pub struct FlatModel;

    impl DeviceModel for FlatModel {
        fn compute_metrics(
            &self,
            material: &MaterialInputs,
            _process: &ProcessParameters,
        ) -> Result<RawMetrics, ModelError> {
            Ok([(VTH_V, 0.3 * material.band_gap_ev)].into_iter().collect())
        }

        fn compute_percentiles(
            &self,
            _metrics: &RawMetrics,
        ) -> Result<PercentileScores, ModelError> {
            Ok([
                (ION_PERCENT, 60.0),
                (GM_PERCENT, 60.0),
                (FT_PERCENT, 60.0),
                (VTH_SCORE_PERCENT, 60.0),
            ]
            .into_iter()
            .collect())
        }
    }

    /// Predictor that accepts any text containing a `data_` block and
    /// returns fixed properties, the way a memoized inference handle would.
    pub struct FixedPredictor {
        pub properties: PredictedProperties,
    }

    impl PropertyPredictor for FixedPredictor {
        fn predict(&self, structure_text: &str) -> Result<PredictedProperties, PredictionError> {
            if !structure_text.contains("data_") {
                return Err(PredictionError::InvalidStructure(
                    "no data_ block found".to_string(),
                ));
            }
            Ok(self.properties)
        }
    }
}

use common::{FixedPredictor, FlatModel};
use mosfet_screener::screening::{
    BaselineSet, Decision, ModelRegistry, PredictedProperties, PredictionError,
    ScreeningConditions, ScreeningError, ScreeningService,
};
use std::sync::Arc;

const CIF_STUB: &str = "data_Si\n_cell_length_a 5.431\n";

fn predictor() -> FixedPredictor {
    FixedPredictor {
        properties: PredictedProperties {
            bandgap: 1.8,
            formation_energy: -0.45,
            permittivity: 7.1,
        },
    }
}

#[test]
fn structure_path_echoes_the_resolved_inputs() {
    let service = ScreeningService::new(Arc::new(FlatModel), BaselineSet::standard());
    let conditions = ScreeningConditions {
        temp: Some(350.0),
        vdd: None,
    };

    let result = service
        .screen_structure(&predictor(), CIF_STUB, &conditions)
        .expect("structure screening runs");

    let inputs = result.inputs.expect("inputs echoed on structure path");
    assert_eq!(inputs.material.band_gap_ev, 1.8);
    assert_eq!(inputs.material.permittivity, 7.1);
    assert_eq!(inputs.material.formation_energy_ev_atom, -0.45);
    assert_eq!(inputs.process.temperature_k, 350.0);
    assert_eq!(inputs.process.supply_v, 0.9);

    assert_eq!(result.score, 60.0);
    assert_eq!(result.decision, Decision::Unsure);
}

#[test]
fn inputs_serialize_with_wire_names() {
    let service = ScreeningService::new(Arc::new(FlatModel), BaselineSet::empty());

    let result = service
        .screen_structure(&predictor(), CIF_STUB, &ScreeningConditions::default())
        .expect("structure screening runs");
    let json = serde_json::to_value(&result).expect("envelope serializes");

    assert_eq!(json["inputs"]["material"]["Eg_eV"], serde_json::json!(1.8));
    assert_eq!(json["inputs"]["process"]["T_K"], serde_json::json!(300.0));
    assert_eq!(json["inputs"]["process"]["NA_cm3"], serde_json::json!(1.0e17));
}

#[test]
fn unparseable_structure_is_fatal_for_this_entry_point() {
    let service = ScreeningService::new(Arc::new(FlatModel), BaselineSet::standard());

    let err = service
        .screen_structure(&predictor(), "not a structure at all", &ScreeningConditions::default())
        .expect_err("invalid structure rejected");

    assert!(matches!(
        err,
        ScreeningError::Structure(PredictionError::InvalidStructure(_))
    ));
}

#[test]
fn registry_serves_one_predictor_handle_across_requests() {
    let registry: ModelRegistry<FixedPredictor> = ModelRegistry::new();
    let service = ScreeningService::new(Arc::new(FlatModel), BaselineSet::standard());

    for _ in 0..2 {
        let handle = registry
            .get_or_create("fixed-v1", || Ok::<_, PredictionError>(predictor()))
            .expect("predictor handle resolves");
        service
            .screen_structure(handle.as_ref(), CIF_STUB, &ScreeningConditions::default())
            .expect("structure screening runs");
    }

    assert_eq!(registry.len(), 1);
}
