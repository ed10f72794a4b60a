use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decoded spreadsheet line of a band sheet.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct BandRow {
    #[serde(default)]
    pub master: Value,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<String>,
    #[serde(default)]
    pub vertical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl BandRow {
    pub fn new(master: Value, start: f64, end: f64) -> Self {
        Self {
            master,
            start,
            end,
            ..Self::default()
        }
    }

    pub fn has_master(&self) -> bool {
        is_truthy(&self.master)
    }
}

/// All rows sharing one `master` value, positioned by the first of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub master: Value,
    pub start: f64,
    pub end: f64,
    pub vertical: bool,
    pub rows: Vec<BandRow>,
}

impl Segment {
    pub fn first_content(&self) -> Option<&str> {
        self.rows.first().map(|row| row.content.as_str())
    }
}

/// The segments visible on one page plus the span used to scale them.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub segments: Vec<Segment>,
    pub span_length: f64,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Truthiness of a sheet cell: absent, null, false, 0, NaN and "" are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric reading of a cell. Numeric strings are accepted.
pub fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer reading of a cell, used for item numbers.
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Canonical grouping key for a `master` cell.
///
/// Numbers compare by value, so `1` and `1.0` share a key. Strings never
/// collide with numbers.
pub fn master_key(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::Number(n) => n.as_f64().map(|f| format!("n:{f}")),
        Value::String(s) => Some(format!("s:{s}")),
        other => Some(format!("v:{other}")),
    }
}

/// Formats a cell value for labels.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Formats an extent for axis labels, without a trailing `.0` on whole numbers.
pub fn display_extent(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
