use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::purge::CssPurge;
use crate::whitelist::Whitelist;

/// Metadata describing a purge run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the report format
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,

    /// Stylesheet that was purged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Where the purged stylesheet was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Purger version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purger_version: Option<String>,
}

/// Rule and size counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeStatistics {
    pub rules_total: usize,
    pub rules_retained: usize,
    pub rules_dropped: usize,

    /// Rules without class selectors, always retained
    pub classless_rules: usize,

    pub whitelist_size: usize,
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub banner_kept: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Summary of what a purge kept and removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeReport {
    pub metadata: ReportMetadata,
    pub statistics: PurgeStatistics,

    /// Whitelisted classes and the number of retained rules selecting them
    pub retained_classes: IndexMap<String, usize>,

    /// Classes whose rules were all dropped, with the number of dropped rules
    pub dropped_classes: IndexMap<String, usize>,
}

impl PurgeReport {
    /// Collect the report for purging `purge` with `whitelist` into `output`
    pub fn new(purge: &CssPurge, whitelist: &Whitelist, input_size: usize, output: &str) -> Self {
        let mut statistics = PurgeStatistics {
            rules_total: purge.rules().len(),
            whitelist_size: whitelist.len(),
            input_size_bytes: input_size,
            output_size_bytes: output.len(),
            banner_kept: !purge.banner().is_empty() && output.starts_with("/* "),
            ..PurgeStatistics::default()
        };

        let mut retained_classes = IndexMap::new();
        let mut dropped_classes = IndexMap::new();
        let mut kept = IndexSet::new();

        for rule in purge.rules() {
            if rule.is_classless() {
                statistics.classless_rules += 1;
                statistics.rules_retained += 1;
            } else if rule.matches_whitelist(whitelist) {
                statistics.rules_retained += 1;
                kept.extend(rule.classes().iter().cloned());
                for class in rule.classes().iter().filter(|c| whitelist.contains(c)) {
                    *retained_classes.entry(class.clone()).or_insert(0) += 1;
                }
            } else {
                statistics.rules_dropped += 1;
                for class in rule.classes() {
                    *dropped_classes.entry(class.clone()).or_insert(0) += 1;
                }
            }
        }

        // A class that also appears in a kept rule was not purged
        dropped_classes.retain(|class, _| !kept.contains(class));

        Self {
            metadata: ReportMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                input: None,
                output: None,
                purger_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            statistics,
            retained_classes,
            dropped_classes,
        }
    }

    /// Record the input and output paths
    pub fn with_paths(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.metadata.input = Some(input.into());
        self.metadata.output = Some(output.into());
        self
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.statistics.processing_time_ms = Some(millis);
        self
    }

    /// Share of input bytes removed by the purge, between 0 and 1
    pub fn reduction_ratio(&self) -> f64 {
        let stats = &self.statistics;
        if stats.input_size_bytes == 0 {
            return 0.0;
        }
        1.0 - (stats.output_size_bytes as f64 / stats.input_size_bytes as f64)
    }

    /// Convert report to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
