//! Per-call result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field failures of one build, keyed by property name.
///
/// Keys iterate in sorted order so reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorReport(BTreeMap<String, Vec<String>>);

impl ErrorReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Records reasons against a field.
    ///
    /// A field always ends up with at least one reason.
    pub fn record(&mut self, field: &str, reasons: Vec<String>) {
        let entry = self.0.entry(field.to_string()).or_default();
        if reasons.is_empty() {
            entry.push(format!("{} is invalid", field));
        } else {
            entry.extend(reasons);
        }
    }

    /// Whether no field failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the field failed
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Reasons recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Failed field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Field and reasons pairs, sorted by field
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Consumes the report
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

/// Outcome of one create or update call.
///
/// `data` is `Some` exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    /// Built instance, absent if any field failed
    pub data: Option<Map<String, Value>>,
    /// Every field failure of the call
    pub errors: ErrorReport,
}

impl BuildResult {
    pub(crate) fn success(data: Map<String, Value>) -> Self {
        Self {
            data: Some(data),
            errors: ErrorReport::new(),
        }
    }

    pub(crate) fn failure(errors: ErrorReport) -> Self {
        Self { data: None, errors }
    }

    /// Whether the instance was built
    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }

    /// Converts into a `Result`
    pub fn into_result(self) -> Result<Map<String, Value>, ErrorReport> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(self.errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_accumulates() {
        let mut report = ErrorReport::new();
        report.record("name", vec!["too short".into()]);
        report.record("name", vec!["bad pattern".into()]);
        report.record("age", vec!["must be a number".into()]);

        assert_eq!(report.len(), 2);
        assert_eq!(report.get("name").unwrap(), ["too short", "bad pattern"]);
        let fields: Vec<&str> = report.fields().collect();
        assert_eq!(fields, ["age", "name"]);
    }

    #[test]
    fn test_record_without_reasons() {
        let mut report = ErrorReport::new();
        report.record("code", Vec::new());
        assert_eq!(report.get("code").unwrap(), ["code is invalid"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut report = ErrorReport::new();
        report.record("name", vec!["name is required".into()]);
        let result = BuildResult::failure(report);
        assert!(!result.is_ok());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"data": null, "errors": {"name": ["name is required"]}})
        );
    }

    #[test]
    fn test_into_result() {
        let mut data = Map::new();
        data.insert("a".into(), json!(1));
        let ok = BuildResult::success(data.clone());
        assert_eq!(ok.into_result().unwrap(), data);
    }
}
