//! Option catalogs shown on the regrid and metric steps.

use serde::Serialize;
use utoipa::ToSchema;

const TEMPORAL_REGRID: &[(&str, &str)] = &[
    ("full", "Time mean for full period"),
    ("annual", "Annual Means"),
    ("monthly", "Monthly Means"),
    ("daily", "Daily means (from sub-daily data)"),
];

// "regular" carries the label the processing backend has always reported
const SPATIAL_REGRID: &[(&str, &str)] = &[
    ("model", "Use the model data grid"),
    ("obs", "Use the observational data grid"),
    ("regular", "Monthly Means"),
];

const METRICS: &[(&str, &str)] = &[
    ("bias", "Bias: mean bias across full time range"),
    ("mae", "Mean Absolute Error: across full time range"),
    ("difference", "Difference: calculated at each time unit"),
    ("acc", "Anomaly Correlation"),
    ("patcor", "Pattern Correlation"),
    ("pdf", "Probability Distribution Function similarity score"),
    ("rms", "RMS Error"),
];

/// A selectable option: form value plus label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogOption {
    pub key: &'static str,
    pub label: &'static str,
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

fn options(table: &'static [(&'static str, &'static str)]) -> Vec<CatalogOption> {
    table
        .iter()
        .map(|&(key, label)| CatalogOption { key, label })
        .collect()
}

pub fn temporal_regrid_label(key: &str) -> Option<&'static str> {
    lookup(TEMPORAL_REGRID, key)
}

pub fn spatial_regrid_label(key: &str) -> Option<&'static str> {
    lookup(SPATIAL_REGRID, key)
}

pub fn metric_label(key: &str) -> Option<&'static str> {
    lookup(METRICS, key)
}

pub fn temporal_regrid_options() -> Vec<CatalogOption> {
    options(TEMPORAL_REGRID)
}

pub fn spatial_regrid_options() -> Vec<CatalogOption> {
    options(SPATIAL_REGRID)
}

pub fn metric_options() -> Vec<CatalogOption> {
    options(METRICS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(temporal_regrid_label("annual"), Some("Annual Means"));
        assert_eq!(spatial_regrid_label("obs"), Some("Use the observational data grid"));
        assert_eq!(metric_label("rms"), Some("RMS Error"));
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(temporal_regrid_label("hourly"), None);
        assert_eq!(spatial_regrid_label(""), None);
        assert_eq!(metric_label("BIAS"), None);
    }

    #[test]
    fn test_option_lists_keep_order() {
        let metrics = metric_options();
        assert_eq!(metrics.len(), 7);
        assert_eq!(metrics[0].key, "bias");
        assert_eq!(metrics[6].key, "rms");
        assert_eq!(temporal_regrid_options()[0].key, "full");
        assert_eq!(spatial_regrid_options().len(), 3);
    }
}
