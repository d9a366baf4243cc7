//! Transaction record abstraction
//!
//! Filtering and sorting work over anything that can look up a field by
//! name. JSON values, string maps and the typed [`Operation`] all qualify.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Result of looking up a field on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Missing,
    Text(&'a str),
    /// Present but not a string (number, null, nested object...)
    Other,
}

impl<'a> Field<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A transaction-like record: a mapping of field name to value
pub trait Record {
    /// False for items that are not field mappings at all (e.g. a JSON array)
    fn is_mapping(&self) -> bool {
        true
    }

    fn field(&self, name: &str) -> Field<'_>;
}

fn json_field<'a>(value: Option<&'a JsonValue>) -> Field<'a> {
    match value {
        None => Field::Missing,
        Some(JsonValue::String(s)) => Field::Text(s),
        Some(_) => Field::Other,
    }
}

impl Record for JsonValue {
    fn is_mapping(&self) -> bool {
        self.is_object()
    }

    fn field(&self, name: &str) -> Field<'_> {
        match self {
            JsonValue::Object(map) => json_field(map.get(name)),
            _ => Field::Missing,
        }
    }
}

impl Record for Map<String, JsonValue> {
    fn field(&self, name: &str) -> Field<'_> {
        json_field(self.get(name))
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Field<'_> {
        self.get(name).map_or(Field::Missing, |s| Field::Text(s))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Field<'_> {
        self.get(name).map_or(Field::Missing, |s| Field::Text(s))
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn is_mapping(&self) -> bool {
        (**self).is_mapping()
    }

    fn field(&self, name: &str) -> Field<'_> {
        (**self).field(name)
    }
}

/// Currency of an operation amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    pub code: String,
}

/// Amount as exported: a decimal string plus its currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationAmount {
    pub amount: String,
    pub currency: Currency,
}

/// A bank operation in the JSON export format
///
/// `from` and `to` hold labeled entity strings such as
/// `"Visa Classic 6831982476737658"` or `"Счет 64686473678894779589"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: i64,
    pub state: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_amount: Option<OperationAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Fields this model doesn't know about, kept for round-tripping
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl Operation {
    pub fn new(id: i64, state: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            state: state.into(),
            date: date.into(),
            operation_amount: None,
            description: None,
            from: None,
            to: None,
            extra: HashMap::new(),
        }
    }
}

impl Record for Operation {
    fn field(&self, name: &str) -> Field<'_> {
        match name {
            "state" => Field::Text(&self.state),
            "date" => Field::Text(&self.date),
            "description" => self.description.as_deref().map_or(Field::Missing, Field::Text),
            "from" => self.from.as_deref().map_or(Field::Missing, Field::Text),
            "to" => self.to.as_deref().map_or(Field::Missing, Field::Text),
            "id" => Field::Other,
            "operationAmount" if self.operation_amount.is_some() => Field::Other,
            "operationAmount" => Field::Missing,
            other => json_field(self.extra.get(other)),
        }
    }
}
