//! Filtering and sorting of transaction records
//!
//! Both operations return new vectors; the input slice is never reordered.
//! Filtering is lenient (non-mapping items are skipped) while sorting is
//! strict (every record needs a parseable string date).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{Field, Record};
use crate::services::dates::parse_date_time;

/// Status kept by [`filter_by_state`] when the caller has no preference
pub const DEFAULT_STATE: &str = "EXECUTED";

/// Field names used to read records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    #[serde(default = "default_status_field")]
    pub status_field: String,
    #[serde(default = "default_date_field")]
    pub date_field: String,
    #[serde(default = "default_status")]
    pub default_status: String,
}

fn default_status_field() -> String {
    "state".to_string()
}

fn default_date_field() -> String {
    "date".to_string()
}

fn default_status() -> String {
    DEFAULT_STATE.to_string()
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            status_field: default_status_field(),
            date_field: default_date_field(),
            default_status: default_status(),
        }
    }
}

/// Record filtering and sorting with configurable field names
#[derive(Debug, Clone, Default)]
pub struct OperationService {
    fields: RecordFields,
}

impl OperationService {
    pub fn new(fields: RecordFields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Keep mappings whose status equals `state` (or the configured default)
    pub fn filter_by_state<R: Record + Clone>(&self, records: &[R], state: Option<&str>) -> Vec<R> {
        let state = state.unwrap_or(self.fields.default_status.as_str());
        let status_field = self.fields.status_field.as_str();

        let kept: Vec<R> = records
            .iter()
            .filter(|r| r.is_mapping() && r.field(status_field) == Field::Text(state))
            .cloned()
            .collect();

        log::debug!("kept {} of {} records", kept.len(), records.len());
        kept
    }

    /// Stable sort by the date field; `descending` puts the newest first
    pub fn sort_by_date<R: Record + Clone>(&self, records: &[R], descending: bool) -> Result<Vec<R>> {
        let date_field = self.fields.date_field.as_str();

        let mut keyed: Vec<(NaiveDateTime, &R)> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let value = record.field(date_field).as_text().ok_or_else(|| {
                    Error::invalid_input(format!(
                        "record {} must have a string '{}' field",
                        index, date_field
                    ))
                })?;
                Ok::<_, Error>((parse_date_time(value)?, record))
            })
            .collect::<Result<_>>()?;

        // slice::sort_by is stable, so reversing the comparator keeps ties in input order
        if descending {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        }

        log::debug!(
            "sorted {} records by '{}' ({})",
            keyed.len(),
            date_field,
            if descending { "newest first" } else { "oldest first" }
        );
        Ok(keyed.into_iter().map(|(_, record)| record.clone()).collect())
    }
}

/// Keep records whose `state` field equals `state`, in input order
pub fn filter_by_state<R: Record + Clone>(records: &[R], state: &str) -> Vec<R> {
    OperationService::default().filter_by_state(records, Some(state))
}

/// Sort records by their `date` field; stable, newest first when `descending`
pub fn sort_by_date<R: Record + Clone>(records: &[R], descending: bool) -> Result<Vec<R>> {
    OperationService::default().sort_by_date(records, descending)
}
