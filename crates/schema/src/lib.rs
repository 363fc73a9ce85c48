//! # Findata Schema
//!
//! The validation step between the scrapers and the write pipeline. Each
//! dataset has a fixed, ordered column schema; [`check_schema`] coerces raw
//! record mappings into a typed [`Batch`] aligned to that schema, or fails
//! with a [`SchemaError`] that aborts the batch before it reaches the store.

use core_types::{Batch, Row, Value};
use serde_json::Value as JsonValue;

pub mod dataset;
pub mod error;

pub use dataset::{Field, FieldKind, TableSchema};
pub use error::SchemaError;

/// A raw record as produced by a scraper: one JSON object mapping column
/// names to scalar values.
pub type RawRecord = serde_json::Map<String, JsonValue>;

/// Coerce raw records into the typed, ordered schema of `dataset`.
///
/// Every record must carry every schema field; values are coerced to the
/// field's kind (numeric strings are accepted, the exchanges serve numbers
/// as text). The returned batch's column order is the schema's field order.
pub fn check_schema(dataset: &str, records: &[RawRecord]) -> Result<Batch, SchemaError> {
    let schema = dataset::lookup(dataset)
        .ok_or_else(|| SchemaError::UnknownDataset(dataset.to_string()))?;

    let columns = schema
        .fields
        .iter()
        .map(|field| field.name.to_string())
        .collect();
    let mut batch = Batch::new(columns);

    for record in records {
        let mut values = Vec::with_capacity(schema.fields.len());
        for field in schema.fields {
            let raw = record.get(field.name).ok_or(SchemaError::MissingField {
                dataset: schema.name,
                field: field.name,
            })?;
            values.push(coerce(field, raw)?);
        }
        batch.push(Row::new(values))?;
    }

    Ok(batch)
}

fn coerce(field: &Field, raw: &JsonValue) -> Result<Value, SchemaError> {
    match field.kind {
        FieldKind::Text => match raw {
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            JsonValue::Number(n) => Ok(Value::Text(n.to_string())),
            other => Err(mismatch(field, "text", other)),
        },
        FieldKind::Int => match raw {
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| mismatch(field, "an integer", raw)),
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| mismatch(field, "an integer", raw)),
            other => Err(mismatch(field, "an integer", other)),
        },
        FieldKind::Float => match raw {
            JsonValue::Number(n) => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| mismatch(field, "a number", raw)),
            JsonValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch(field, "a number", raw)),
            other => Err(mismatch(field, "a number", other)),
        },
    }
}

fn mismatch(field: &Field, expected: &'static str, got: &JsonValue) -> SchemaError {
    SchemaError::TypeMismatch {
        field: field.name,
        expected,
        got: got.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stock_record() -> RawRecord {
        json!({
            "StockID": "2330",
            "TradeVolume": "31000",
            "Transaction": 12547,
            "TradeValue": "18432519593",
            "Open": 593.0,
            "Max": "595.00",
            "Min": 588.5,
            "Close": 590.0,
            "Change": -3.0,
            "date": "2024-07-01",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn valid_records_build_a_batch_in_schema_order() {
        let batch = check_schema("taiwan_stock_price", &[stock_record()]).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.columns()[0], "StockID");
        assert_eq!(batch.columns()[9], "date");

        let row = &batch.rows()[0];
        assert_eq!(row.values()[0], Value::Text("2330".into()));
        // Numeric strings coerce to the schema's kind.
        assert_eq!(row.values()[1], Value::Int(31000));
        assert_eq!(row.values()[5], Value::Float(595.0));
        assert_eq!(row.values()[9], Value::Text("2024-07-01".into()));
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let err = check_schema("taiwan_stock_news", &[]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDataset(_)));
    }

    #[test]
    fn missing_field_aborts_the_batch() {
        let mut record = stock_record();
        record.remove("Close");

        let err = check_schema("taiwan_stock_price", &[record]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingField { field: "Close", .. }
        ));
    }

    #[test]
    fn mistyped_field_aborts_the_batch() {
        let mut record = stock_record();
        record.insert("TradeVolume".into(), json!("a lot"));

        let err = check_schema("taiwan_stock_price", &[record]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch {
                field: "TradeVolume",
                ..
            }
        ));
    }

    #[test]
    fn futures_dataset_is_registered() {
        let batch = check_schema("taiwan_futures_daily", &[]).unwrap();
        assert_eq!(batch.columns().len(), 13);
        assert_eq!(batch.columns()[1], "FuturesID");
        assert_eq!(batch.columns()[12], "TradingSession");
    }
}
