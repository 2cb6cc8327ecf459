//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Note: ToSchema is derived on all DTOs for OpenAPI documentation generation

use crate::evaluation::catalog::{self, CatalogOption};
use crate::evaluation::{EvaluationTask, TimeRange};
use crate::wizard::BackLink;

// =============================================================================
// Wizard DTOs
// =============================================================================

/// Current state of a wizard session, as shown on a step page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WizardView {
    pub session_id: String,
    /// Current step identifier; may name a step outside the sequence
    pub current_step: String,
    /// Label of the current step when it is part of the sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub total_steps: usize,
    pub is_last: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_link: Option<BackLink>,
    /// `back_link` rendered as an HTML navigation box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_link_html: Option<String>,
    pub task: EvaluationTask,
}

/// Query for starting a wizard task
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StartQuery {
    /// Reuse this session id, discarding the task stored there
    #[serde(default)]
    pub session: Option<String>,
}

/// Model data window submitted on the time range step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelWindowQuery {
    /// `YYYY-MM-DD HH:MM:SS`
    pub start: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub end: String,
}

/// Time range both the model and the chosen observations cover
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverlapResponse {
    pub model: TimeRange,
    pub observation: TimeRange,
    /// Absent when the two windows do not intersect
    pub overlap: Option<TimeRange>,
}

// =============================================================================
// Catalog DTOs
// =============================================================================

/// Selectable options for the regrid and metric steps
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub temporal_regrid: Vec<CatalogOption>,
    pub spatial_regrid: Vec<CatalogOption>,
    pub metrics: Vec<CatalogOption>,
}

impl CatalogResponse {
    pub fn build() -> Self {
        Self {
            temporal_regrid: catalog::temporal_regrid_options(),
            spatial_regrid: catalog::spatial_regrid_options(),
            metrics: catalog::metric_options(),
        }
    }
}

/// Availability window of an observational dataset
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ObservationWindowResponse {
    pub dataset_id: String,
    pub name: String,
    pub window: TimeRange,
}

// =============================================================================
// Health/Status DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Status response with session store info
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub session_store: String,
    pub session_slot: String,
    pub step_count: usize,
}
