//! Step list and option catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::evaluation::time_range::{observation_dataset_name, observation_time_range};
use crate::rest::dto::{CatalogResponse, ObservationWindowResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::wizard::Step;

/// List the configured wizard steps
#[utoipa::path(
    get,
    path = "/api/v1/steps",
    tag = "Catalog",
    responses(
        (status = 200, description = "Wizard steps in order", body = Vec<Step>)
    )
)]
pub async fn steps(State(state): State<ApiState>) -> Json<Vec<Step>> {
    Json(state.steps.as_ref().clone())
}

/// Regrid and metric options
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "Catalog",
    responses(
        (status = 200, description = "Selectable options", body = CatalogResponse)
    )
)]
pub async fn options() -> Json<CatalogResponse> {
    Json(CatalogResponse::build())
}

/// Availability window of an observational dataset
#[utoipa::path(
    get,
    path = "/api/v1/observations/{id}/time-range",
    tag = "Catalog",
    params(
        ("id" = String, Path, description = "Observational dataset id")
    ),
    responses(
        (status = 200, description = "Dataset time range", body = ObservationWindowResponse),
        (status = 404, description = "Unknown dataset", body = ErrorResponse)
    )
)]
pub async fn time_range(
    Path(id): Path<String>,
) -> Result<Json<ObservationWindowResponse>, ApiError> {
    let not_found = || ApiError::NotFound(format!("Observational dataset '{}' not found", id));
    let window = observation_time_range(&id).ok_or_else(not_found)?;
    let name = observation_dataset_name(&id).ok_or_else(not_found)?;

    Ok(Json(ObservationWindowResponse {
        dataset_id: id.clone(),
        name: name.to_string(),
        window,
    }))
}
