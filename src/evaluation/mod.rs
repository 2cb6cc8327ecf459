//! The evaluation task carried through the wizard.
//!
//! An [`EvaluationTask`] wraps the wizard's [`StepSequence`] together with the
//! answers collected on each step. Both are stored in the session as one
//! serialized object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wizard::{Step, StepSequence};

pub mod catalog;
pub mod time_range;

pub use time_range::{compute_overlap, observation_time_range, TimeRange};

/// Default wizard steps for a model evaluation, in order
pub const RCMET_STEPS: &[(&str, &str)] = &[
    ("selectModelFiles", "Select Model Files"),
    ("selectLatLonVars", "Select Latitude and Longitude Variables"),
    ("selectTimeVars", "Select Time Variable"),
    ("selectModelVar", "Select Model Variable"),
    ("selectObservationalData", "Select Observational Data"),
    ("selectTimeRange", "Select Time Range for Calculation"),
    ("selectRegrid", "Select Regridding Options"),
    ("selectOptionalTasks", "Select Optional Calculation Tasks"),
    ("selectMetricOptions", "Select Metrics"),
    ("selectPlotOptions", "Select Plot Options"),
    ("generatePlots", "Generate Plots"),
];

/// The default step list as owned values
pub fn rcmet_steps() -> Vec<Step> {
    RCMET_STEPS.iter().map(|&(id, label)| Step::new(id, label)).collect()
}

/// Minimum and maximum of one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// Spatial extent of the model data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModelBounds {
    pub lat: AxisBounds,
    pub lon: AxisBounds,
}

/// Wizard state plus every answer collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EvaluationTask {
    #[serde(flatten)]
    sequence: StepSequence,

    #[serde(default)]
    pub model_file_paths: Vec<String>,
    /// Model variable roles (e.g. "lat", "lon", "time") to variable names
    #[serde(default)]
    pub model_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub model_bounds: Option<ModelBounds>,
    #[serde(default)]
    pub model_parameter: String,

    #[serde(default)]
    pub observational_parameter: String,
    #[serde(default)]
    pub observational_parameter_id: String,
    #[serde(default)]
    pub observational_dataset: String,
    #[serde(default)]
    pub observational_dataset_id: String,

    #[serde(default)]
    pub range_start: Option<String>,
    #[serde(default)]
    pub range_end: Option<String>,

    #[serde(default)]
    pub spatial_regrid_option: Option<String>,
    #[serde(default)]
    pub temporal_regrid_option: Option<String>,

    #[serde(default)]
    pub compute_area_averages: Option<bool>,

    #[serde(default)]
    pub metric: Option<String>,
}

/// Partial update submitted with a step form. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EvaluationUpdate {
    pub model_file_paths: Option<Vec<String>>,
    pub model_vars: Option<BTreeMap<String, String>>,
    pub model_bounds: Option<ModelBounds>,
    pub model_parameter: Option<String>,
    pub observational_parameter: Option<String>,
    pub observational_parameter_id: Option<String>,
    pub observational_dataset: Option<String>,
    pub observational_dataset_id: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub spatial_regrid_option: Option<String>,
    pub temporal_regrid_option: Option<String>,
    pub compute_area_averages: Option<bool>,
    pub metric: Option<String>,
}

impl EvaluationTask {
    /// Start a task over the given steps
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            sequence: StepSequence::new(steps),
            ..Self::default()
        }
    }

    /// Start a task over the default evaluation steps
    pub fn rcmet() -> Self {
        Self::new(rcmet_steps())
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut StepSequence {
        &mut self.sequence
    }

    /// Merge the fields present in `update` into the task
    pub fn apply(&mut self, update: EvaluationUpdate) {
        if let Some(v) = update.model_file_paths {
            self.model_file_paths = v;
        }
        if let Some(v) = update.model_vars {
            self.model_vars.extend(v);
        }
        if let Some(v) = update.model_bounds {
            self.model_bounds = Some(v);
        }
        if let Some(v) = update.model_parameter {
            self.model_parameter = v;
        }
        if let Some(v) = update.observational_parameter {
            self.observational_parameter = v;
        }
        if let Some(v) = update.observational_parameter_id {
            self.observational_parameter_id = v;
        }
        if let Some(v) = update.observational_dataset {
            self.observational_dataset = v;
        }
        if let Some(v) = update.observational_dataset_id {
            self.observational_dataset_id = v;
        }
        if update.range_start.is_some() {
            self.range_start = update.range_start;
        }
        if update.range_end.is_some() {
            self.range_end = update.range_end;
        }
        if update.spatial_regrid_option.is_some() {
            self.spatial_regrid_option = update.spatial_regrid_option;
        }
        if update.temporal_regrid_option.is_some() {
            self.temporal_regrid_option = update.temporal_regrid_option;
        }
        if update.compute_area_averages.is_some() {
            self.compute_area_averages = update.compute_area_averages;
        }
        if update.metric.is_some() {
            self.metric = update.metric;
        }
    }

    /// Availability window of the selected observational dataset
    pub fn observation_window(&self) -> Option<TimeRange> {
        observation_time_range(&self.observational_dataset_id)
    }
}
