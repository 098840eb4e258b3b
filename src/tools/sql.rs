//! SQL batch generator for inventory updates
//!
//! Reads a JSON array of stone records and emits one transaction that
//! updates the dimensions, shape and price of each inventory item.

use serde_json::Value;
use thiserror::Error;

use crate::board::coords::fmt_num;

/// Table updated when none is given
pub const DEFAULT_TABLE: &str = "inventory_items";

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("Failed to parse records JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

/// Generate the update transaction for every record in `source`.
///
/// Field values are interpolated as-is; records are not validated.
pub fn generate_updates(source: &str, table: &str) -> Result<String, SqlError> {
    let data: Value = serde_json::from_str(source)?;
    let records = match &data {
        Value::Array(records) => records,
        other => return Err(SqlError::NotAnArray(kind(other))),
    };

    let mut lines = Vec::with_capacity(records.len() * 5 + 2);
    lines.push("begin;".to_string());
    for record in records {
        lines.extend(record_updates(record, table));
    }
    lines.push("commit;".to_string());

    tracing::debug!(records = records.len(), statements = lines.len() - 2, "generated SQL batch");
    Ok(lines.join("\n"))
}

fn record_updates(record: &Value, table: &str) -> [String; 5] {
    let id = field(record, "id");
    let cts = field(record, "cts");
    let filter = format!(r#"where unique_id = "{}" and current_weight = {};"#, id, cts);
    let set_property = |key: &str, value: String| {
        format!(
            "update {} set properties = JSON_SET(properties, \"$.{}\", {}) {}",
            table, key, value, filter
        )
    };

    [
        set_property("L", field(record, "length")),
        set_property("W", field(record, "width")),
        set_property("H", field(record, "height")),
        set_property("Shape", format!("\"{}\"", field(record, "shape"))),
        format!(
            "update {} set sale_price = {} {}",
            table,
            field(record, "price"),
            filter
        ),
    ]
}

/// Text of a record field as it appears in a statement; missing fields read `null`
fn field(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => fmt_num(f),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
