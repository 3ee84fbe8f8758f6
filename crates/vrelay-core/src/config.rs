//! Orchestrator configuration.

use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::filter::FilterPolicy;
use crate::trigger::TriggerSet;

/// SpeciesNet's "blank" class string.
pub const DEFAULT_BLANK_LABEL: &str = "f1856211-cfb7-4a5b-9158-c0f72fd09ee6;;;;;;blank";

pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.1;

pub const DEFAULT_TRIGGER_LABELS: &[&str] = &["animal", "cat", "dog", "bird"];

/// Orchestrator configuration, fixed for the orchestrator's lifetime.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Primary labels that force a specialist run
    pub triggers: TriggerSet,
    /// Specialist noise filter
    pub filter: FilterPolicy,
    /// Optional bound on gate admission plus specialist execution
    pub specialist_budget: Option<Duration>,
    /// Whether a failed primary call still runs the specialist
    pub specialist_on_primary_failure: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            triggers: TriggerSet::new(DEFAULT_TRIGGER_LABELS),
            filter: FilterPolicy::new(DEFAULT_BLANK_LABEL, DEFAULT_CONFIDENCE_FLOOR),
            specialist_budget: None,
            specialist_on_primary_failure: true,
        }
    }
}

impl OrchestratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let triggers = match lookup("TRIGGER_LABELS") {
            Some(raw) => parse_trigger_labels(&raw)?,
            None => TriggerSet::new(DEFAULT_TRIGGER_LABELS),
        };

        let blank_label = lookup("SPECIESNET_BLANK_LABEL")
            .unwrap_or_else(|| DEFAULT_BLANK_LABEL.to_string());

        let confidence_floor = match lookup("CONFIDENCE_FLOOR") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| CoreError::config(format!("CONFIDENCE_FLOOR is not a number: {}", raw)))?,
            None => DEFAULT_CONFIDENCE_FLOOR,
        };
        if !(0.0..=1.0).contains(&confidence_floor) {
            return Err(CoreError::config(format!(
                "CONFIDENCE_FLOOR must be within [0, 1], got {}",
                confidence_floor
            )));
        }

        let specialist_budget = match lookup("SPECIALIST_BUDGET") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw.trim().parse::<f64>().map_err(|_| {
                    CoreError::config(format!("SPECIALIST_BUDGET is not a number: {}", raw))
                })?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(CoreError::config(format!(
                        "SPECIALIST_BUDGET must be positive, got {}",
                        raw
                    )));
                }
                Some(Duration::from_secs_f64(secs))
            }
            _ => None,
        };

        let specialist_on_primary_failure = lookup("SPECIALIST_ON_PRIMARY_FAILURE")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        Ok(Self {
            triggers,
            filter: FilterPolicy::new(blank_label, confidence_floor),
            specialist_budget,
            specialist_on_primary_failure,
        })
    }
}

/// Parse a comma-separated label list. JSON-style brackets and quotes are
/// tolerated so `["cat", "dog"]` works as well as `cat,dog`.
fn parse_trigger_labels(raw: &str) -> CoreResult<TriggerSet> {
    let labels: Vec<String> = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if labels.is_empty() {
        return Err(CoreError::config("TRIGGER_LABELS contains no labels"));
    }
    Ok(TriggerSet::new(labels))
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
