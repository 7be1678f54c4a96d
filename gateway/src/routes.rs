use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use link_budget::{LinkBudgetInput, LinkBudgetReport, ValidationError};

/// Response body for a link budget calculation.
///
/// Success carries both derived values; failure carries only the validation
/// message. The two never mix: a rejected request has no numeric output.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ComputeResponse {
    Report(LinkBudgetReport),
    Failed { error: String },
}

impl From<Result<LinkBudgetReport, ValidationError>> for ComputeResponse {
    fn from(result: Result<LinkBudgetReport, ValidationError>) -> Self {
        match result {
            Ok(report) => ComputeResponse::Report(report),
            Err(err) => ComputeResponse::Failed {
                error: err.to_string(),
            },
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "link-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Compute a link budget from a request dictionary.
///
/// Validation failures are reported in-band as `{"error": msg}` so the
/// orchestrator never sees a transport fault for a malformed request.
pub async fn compute_link_budget(
    Json(payload): Json<serde_json::Value>,
) -> Json<ComputeResponse> {
    let result = LinkBudgetInput::from_payload(&payload)
        .and_then(|input| link_budget::compute(&input));

    match &result {
        Ok(report) => tracing::debug!(
            "computed link budget: {:.2} m, {:.2} dB",
            report.distance_m,
            report.path_loss_db
        ),
        Err(err) => tracing::debug!("rejected link budget request: {}", err),
    }

    Json(result.into())
}

/// Compute the link budget for the deployment's default constellation.
pub async fn default_link_budget(State(state): State<AppState>) -> Json<ComputeResponse> {
    Json(link_budget::compute(&state.defaults).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compute_success_body_shape() {
        let payload = serde_json::json!({
            "num_satellites": 24,
            "altitude": 500_000.0,
            "frequency": 2.4e9,
        });
        let Json(response) = compute_link_budget(Json(payload)).await;

        let body = serde_json::to_value(&response).unwrap();
        assert!(body.get("distance_m").is_some());
        assert!(body.get("path_loss_db").is_some());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_compute_failure_body_shape() {
        let payload = serde_json::json!({
            "num_satellites": -1,
            "altitude": 500_000.0,
            "frequency": 2.4e9,
        });
        let Json(response) = compute_link_budget(Json(payload)).await;

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(
            body.get("error").and_then(|v| v.as_str()),
            Some("Number of satellites must be a positive integer.")
        );
        assert!(body.get("distance_m").is_none());
        assert!(body.get("path_loss_db").is_none());
    }

    #[tokio::test]
    async fn test_default_route_uses_state() {
        let state = AppState {
            defaults: std::sync::Arc::new(LinkBudgetInput {
                satellite_count: 24,
                altitude_m: 500_000.0,
                frequency_hz: 2.4e9,
            }),
        };
        let Json(response) = default_link_budget(State(state)).await;

        match response {
            ComputeResponse::Report(report) => {
                assert!((report.distance_m - 1_798_823.59).abs() < 0.05);
            }
            ComputeResponse::Failed { error } => panic!("unexpected failure: {error}"),
        }
    }
}
