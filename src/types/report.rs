use std::collections::BTreeMap;

use serde::Serialize;

/// Outcome of a destroy call: every requested path maps to `None` on success
/// or to a human-readable failure reason.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DestroyResult(BTreeMap<String, Option<String>>);

impl DestroyResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `key`. A key already present keeps its first
    /// outcome.
    pub(crate) fn record(&mut self, key: impl Into<String>, outcome: Option<String>) {
        self.0.entry(key.into()).or_insert(outcome);
    }

    pub(crate) fn merge(&mut self, partial: impl IntoIterator<Item = (String, Option<String>)>) {
        for (k, v) in partial {
            self.record(k, v);
        }
    }

    /// `Some(None)` for success, `Some(Some(msg))` for failure, `None` when the
    /// path was not part of the request.
    pub fn get(&self, path: &str) -> Option<Option<&str>> {
        self.0.get(path).map(Option::as_deref)
    }

    pub fn is_success(&self) -> bool {
        self.0.values().all(Option::is_none)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|m| (k.as_str(), m)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Option<String>> {
        self.0
    }
}
