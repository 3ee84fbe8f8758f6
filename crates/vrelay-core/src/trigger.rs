//! Specialist trigger policy.

use std::collections::HashSet;

use vrelay_models::Detection;

/// Labels that force a specialist run, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet {
    labels: HashSet<String>,
}

impl TriggerSet {
    /// Build a trigger set. Labels are stored lower-cased.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|l| l.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Check whether a label is a trigger, ignoring case.
    pub fn matches(&self, label: &str) -> bool {
        self.labels.contains(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Decide whether a primary result warrants running the specialist.
///
/// An empty primary batch always triggers. Otherwise any detection whose
/// label is in `triggers` does.
pub fn should_invoke_specialist(primary: &[Detection], triggers: &TriggerSet) -> bool {
    primary.is_empty() || first_trigger(primary, triggers).is_some()
}

/// First primary detection whose label is a trigger.
pub fn first_trigger<'a>(primary: &'a [Detection], triggers: &TriggerSet) -> Option<&'a Detection> {
    primary.iter().find(|d| triggers.matches(&d.label))
}
