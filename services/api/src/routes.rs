use crate::infra::{tabulated_predictor, AppState, TabulatedPropertyPredictor};
use crate::model::AnalyticDeviceModel;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use mosfet_screener::error::AppError;
use mosfet_screener::screening::{
    ranking, CandidateProperties, ModelRegistry, RankingView, ScreeningConditions, ScreeningError,
    ScreeningResult, ScreeningService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Shared, read-only handles the screening endpoints work against.
#[derive(Clone)]
pub(crate) struct ScreeningContext {
    pub(crate) service: Arc<ScreeningService<AnalyticDeviceModel>>,
    pub(crate) predictors: Arc<ModelRegistry<TabulatedPropertyPredictor>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreenRequest {
    pub(crate) props: CandidateProperties,
    #[serde(default)]
    pub(crate) device: Option<String>,
    #[serde(default)]
    pub(crate) conditions: ScreeningConditions,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructureScreenRequest {
    pub(crate) cif: String,
    #[serde(default)]
    pub(crate) device: Option<String>,
    #[serde(default)]
    pub(crate) conditions: ScreeningConditions,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScreenResponse {
    #[serde(flatten)]
    pub(crate) result: ScreeningResult,
    pub(crate) ranking: RankingView,
    pub(crate) generated_at: DateTime<Utc>,
}

impl ScreenResponse {
    fn assemble(result: ScreeningResult) -> Self {
        let ranking = ranking::assemble(&result.percentiles, &result.baseline_percentiles);
        Self {
            result,
            ranking,
            generated_at: Utc::now(),
        }
    }
}

pub(crate) fn screening_routes(context: ScreeningContext) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/screen", axum::routing::post(screen_endpoint))
        .route(
            "/screen/structure",
            axum::routing::post(structure_screen_endpoint),
        )
        .layer(Extension(context))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn screen_endpoint(
    Extension(context): Extension<ScreeningContext>,
    Json(payload): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    let ScreenRequest {
        props,
        device,
        conditions,
    } = payload;
    if let Some(device) = device {
        // Accepted for request parity; the capability models an n-channel device.
        debug!(%device, "ignoring device discriminator");
    }

    let result = context.service.screen(&props, &conditions)?;
    Ok(Json(ScreenResponse::assemble(result)))
}

pub(crate) async fn structure_screen_endpoint(
    Extension(context): Extension<ScreeningContext>,
    Json(payload): Json<StructureScreenRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    let StructureScreenRequest {
        cif,
        device,
        conditions,
    } = payload;
    if let Some(device) = device {
        debug!(%device, "ignoring device discriminator");
    }

    let predictor = tabulated_predictor(&context.predictors)
        .map_err(|err| AppError::from(ScreeningError::Structure(err)))?;
    let result = context
        .service
        .screen_structure(predictor.as_ref(), &cif, &conditions)?;
    Ok(Json(ScreenResponse::assemble(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosfet_screener::screening::{BaselineSet, Decision};

    fn test_context() -> ScreeningContext {
        ScreeningContext {
            service: Arc::new(ScreeningService::new(
                Arc::new(AnalyticDeviceModel),
                BaselineSet::standard(),
            )),
            predictors: Arc::new(ModelRegistry::new()),
        }
    }

    #[tokio::test]
    async fn screen_endpoint_returns_full_envelope() {
        let request = ScreenRequest {
            props: CandidateProperties::material(1.12, 11.7, 0.0),
            device: Some("nmos".to_string()),
            conditions: ScreeningConditions {
                temp: Some(300.0),
                vdd: Some(1.2),
            },
        };

        let Json(body) = screen_endpoint(Extension(test_context()), Json(request))
            .await
            .expect("screening succeeds");

        assert_eq!(body.result.baseline_percentiles.len(), 5);
        assert_eq!(body.result.model_version, "screener_v1");
        assert_eq!(body.ranking.entries.len(), body.result.percentiles.len());
        assert!(matches!(
            body.result.decision,
            Decision::Suitable | Decision::Unsure | Decision::Unsuitable
        ));
    }

    #[tokio::test]
    async fn screen_endpoint_rejects_incomplete_material() {
        let request = ScreenRequest {
            props: CandidateProperties {
                band_gap_ev: Some(1.1),
                ..CandidateProperties::default()
            },
            device: None,
            conditions: ScreeningConditions::default(),
        };

        let err = screen_endpoint(Extension(test_context()), Json(request))
            .await
            .expect_err("missing keys rejected");
        assert!(matches!(
            err,
            AppError::Screening(ScreeningError::MissingInput { .. })
        ));
    }

    #[tokio::test]
    async fn structure_endpoint_screens_tabulated_compounds() {
        let request = StructureScreenRequest {
            cif: "data_GaAs\n_chemical_formula_sum 'Ga As'\n_cell_length_a 5.65\n".to_string(),
            device: None,
            conditions: ScreeningConditions::default(),
        };

        let Json(body) = structure_screen_endpoint(Extension(test_context()), Json(request))
            .await
            .expect("structure screening succeeds");

        let inputs = body.result.inputs.expect("inputs echoed");
        assert_eq!(inputs.material.band_gap_ev, 1.42);
        assert!(!body.result.percentiles.is_empty());
    }

    #[tokio::test]
    async fn structure_endpoint_rejects_unparseable_text() {
        let request = StructureScreenRequest {
            cif: "not a cif".to_string(),
            device: None,
            conditions: ScreeningConditions::default(),
        };

        let err = structure_screen_endpoint(Extension(test_context()), Json(request))
            .await
            .expect_err("invalid structure rejected");
        assert!(matches!(
            err,
            AppError::Screening(ScreeningError::Structure(_))
        ));
    }
}
