//! JSON output format for hierarchical timer reports
//!
//! Mirrors the text report: same tree, same derived statistics, but
//! machine readable. Values that the text report prints as `nan` or `N/A`
//! are `null` here.

use crate::hierarchical::RegionAccumulator;
use serde::{Deserialize, Serialize};

/// One region and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRegion {
    /// Region name
    pub name: String,
    /// Accumulated seconds over completed cycles
    pub total_time: f64,
    /// Completed start/stop cycles
    pub call_count: u64,
    /// Seconds per cycle (absent before the first cycle completes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time: Option<f64>,
    /// Share of the parent's total (absent for top-level regions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_of_parent: Option<f64>,
    /// Time not covered by direct children (absent without children)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_time: Option<f64>,
    /// Whether the region was open when the snapshot was taken
    pub running: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<JsonRegion>,
}

/// Complete timer snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Top-level regions in first-start order
    pub regions: Vec<JsonRegion>,
    /// Open regions at snapshot time, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub open_regions: Vec<String>,
}

impl JsonReport {
    pub(crate) fn from_tree(root: &RegionAccumulator, open: &[String]) -> Self {
        Self {
            regions: root
                .children()
                .map(|(name, acc)| JsonRegion::build(name, acc, None))
                .collect(),
            open_regions: open.to_vec(),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl JsonRegion {
    fn build(name: &str, acc: &RegionAccumulator, parent: Option<&RegionAccumulator>) -> Self {
        let average = acc.average_time();
        Self {
            name: name.to_string(),
            total_time: acc.total_time(),
            call_count: acc.call_count(),
            average_time: if average.is_nan() { None } else { Some(average) },
            percent_of_parent: parent.map(|p| p.percent_of_total(acc.total_time())),
            other_time: acc.other_time(),
            running: acc.is_running(),
            children: acc
                .children()
                .map(|(child_name, child)| JsonRegion::build(child_name, child, Some(acc)))
                .collect(),
        }
    }
}
