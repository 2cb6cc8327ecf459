//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::evaluation::catalog::CatalogOption;
use crate::evaluation::{AxisBounds, EvaluationTask, EvaluationUpdate, ModelBounds, TimeRange};
use crate::rest::dto::{
    CatalogResponse, HealthResponse, ModelWindowQuery, ObservationWindowResponse, OverlapResponse,
    StatusResponse, WizardView,
};
use crate::rest::error::ErrorResponse;
use crate::wizard::{BackLink, Step, StepSequence};

/// OpenAPI documentation for the evaluation wizard REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RCMET Wizard API",
        version = "0.1.0",
        description = "Session-backed step navigation for the RCMET model evaluation wizard.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Catalog endpoints
        crate::rest::routes::catalog::steps,
        crate::rest::routes::catalog::options,
        crate::rest::routes::catalog::time_range,
        // Wizard endpoints
        crate::rest::routes::wizard::start,
        crate::rest::routes::wizard::view,
        crate::rest::routes::wizard::discard,
        crate::rest::routes::wizard::show_step,
        crate::rest::routes::wizard::submit_step,
        crate::rest::routes::wizard::back,
        crate::rest::routes::wizard::time_range,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            CatalogResponse,
            CatalogOption,
            ObservationWindowResponse,
            WizardView,
            OverlapResponse,
            ErrorResponse,
            // Domain types
            Step,
            StepSequence,
            BackLink,
            EvaluationTask,
            ModelBounds,
            AxisBounds,
            TimeRange,
            // Request types
            EvaluationUpdate,
            ModelWindowQuery,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Catalog", description = "Configured steps and selectable options"),
        (name = "Wizard", description = "Step navigation within a wizard session"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("RCMET Wizard API"));
        assert!(spec.contains("/api/v1/health"));
        assert!(spec.contains("/wizard/{session}/step/{step}"));
    }

    #[test]
    fn test_openapi_has_all_tags() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("\"Health\""));
        assert!(spec.contains("\"Catalog\""));
        assert!(spec.contains("\"Wizard\""));
    }

    #[test]
    fn test_openapi_yaml() {
        let spec = ApiDoc::yaml().expect("Failed to generate OpenAPI YAML");
        assert!(spec.contains("openapi:"));
    }
}
