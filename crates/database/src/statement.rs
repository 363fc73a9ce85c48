//! SQL generation for the upsert path.
//!
//! Statements are rendered as complete text (backtick-quoted identifiers,
//! double-quoted string literals) because that is the wire shape the
//! existing schemas and statement logs expect. The escaping here is a
//! security-relevant contract even though values normally arrive from our
//! own validator: quotes and backslashes must never escape a literal.

use core_types::{Batch, Row};

/// Rows per chunk for the bulk append path.
pub const BULK_CHUNK_ROWS: usize = 1000;

/// One generated insert-or-update statement for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    update_columns: usize,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// False when every value in the row rendered to an empty string and
    /// the update clause degenerated to nothing. Such a statement is not
    /// valid SQL; callers must treat it as a poisoned row.
    pub fn has_update_clause(&self) -> bool {
        self.update_columns > 0
    }
}

/// Escape a value for embedding in a double-quoted MySQL string literal.
///
/// Neutralizes both quote kinds and the backslash, plus the control
/// characters the wire protocol is sensitive to (NUL, LF, CR, Ctrl-Z).
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out
}

/// Backtick-quote a table or column identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render one row's insert-or-update statement.
///
/// The insert clause always lists every column; the update clause lists
/// `column = "value"` only for columns whose escaped value is non-empty.
/// The conflict key is implicit: whatever unique constraint the table
/// already carries.
pub fn build_statement(table: &str, columns: &[String], row: &Row) -> Statement {
    let values = escaped_values(row);

    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(",");
    let value_list = values
        .iter()
        .map(|value| format!("\"{}\"", value))
        .collect::<Vec<_>>()
        .join(",");

    let update_columns = values.iter().filter(|value| !value.is_empty()).count();
    let update = update_clause(columns, &values);

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON DUPLICATE KEY UPDATE {}",
        quote_identifier(table),
        column_list,
        value_list,
        update,
    );

    Statement {
        sql,
        update_columns,
    }
}

/// One statement per row, in batch order.
pub fn build_batch(table: &str, batch: &Batch) -> Vec<Statement> {
    batch
        .rows()
        .iter()
        .map(|row| build_statement(table, batch.columns(), row))
        .collect()
}

/// Plain multi-row append inserts for the bulk fast path, chunked so a
/// large batch never renders into one oversized statement. No conflict
/// handling: a duplicate key fails the chunk, which is exactly what the
/// orchestrator's fallback expects.
pub fn build_bulk_insert(table: &str, batch: &Batch, chunk_rows: usize) -> Vec<String> {
    let column_list = batch
        .columns()
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(",");

    batch
        .rows()
        .chunks(chunk_rows)
        .map(|chunk| {
            let tuples = chunk
                .iter()
                .map(|row| {
                    let values = escaped_values(row)
                        .iter()
                        .map(|value| format!("\"{}\"", value))
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("({})", values)
                })
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "INSERT INTO {} ({}) VALUES {}",
                quote_identifier(table),
                column_list,
                tuples,
            )
        })
        .collect()
}

fn escaped_values(row: &Row) -> Vec<String> {
    row.values()
        .iter()
        .map(|value| escape_string(&value.to_string()))
        .collect()
}

/// `column = "value"` pairs for every column whose escaped value is
/// non-empty; an all-empty row yields an empty clause.
fn update_clause(columns: &[String], values: &[String]) -> String {
    columns
        .iter()
        .zip(values)
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| format!("{} = \"{}\"", quote_identifier(column), value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Value;
    use std::collections::BTreeMap;

    fn batch(columns: &[&str], rows: Vec<Vec<Value>>) -> Batch {
        let mut batch = Batch::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            batch.push(Row::new(row)).unwrap();
        }
        batch
    }

    #[test]
    fn escape_neutralizes_quotes_and_backslashes() {
        assert_eq!(escape_string("2330"), "2330");
        assert_eq!(escape_string(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_string("a'b"), r"a\'b");
        assert_eq!(escape_string(r"a\b"), r"a\\b");
        assert_eq!(escape_string("a\nb\r"), r"a\nb\r");
        assert_eq!(escape_string("a\0b\u{1a}"), r"a\0b\Z");
    }

    #[test]
    fn identifiers_are_backtick_quoted() {
        assert_eq!(quote_identifier("taiwan_stock_price"), "`taiwan_stock_price`");
        assert_eq!(quote_identifier("weird`name"), "`weird``name`");
    }

    #[test]
    fn statement_renders_the_fixed_wire_shape() {
        let batch = batch(
            &["ID", "Price"],
            vec![vec![Value::from("1"), Value::from("10.5")]],
        );
        let statements = build_batch("T", &batch);

        assert_eq!(
            statements[0].sql(),
            r#"INSERT INTO `T` (`ID`,`Price`) VALUES ("1","10.5") ON DUPLICATE KEY UPDATE `ID` = "1", `Price` = "10.5""#
        );
    }

    #[test]
    fn empty_value_is_inserted_but_omitted_from_the_update_clause() {
        let batch = batch(
            &["ID", "Price"],
            vec![
                vec![Value::from("1"), Value::from("10.5")],
                vec![Value::from("2"), Value::from("")],
            ],
        );
        let statements = build_batch("T", &batch);

        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[1].sql(),
            r#"INSERT INTO `T` (`ID`,`Price`) VALUES ("2","") ON DUPLICATE KEY UPDATE `ID` = "2""#
        );
        assert!(statements[1].has_update_clause());
    }

    #[test]
    fn all_empty_row_degenerates_to_an_empty_update_clause() {
        let batch = batch(
            &["ID", "Price"],
            vec![vec![Value::from(""), Value::from("")]],
        );
        let statement = &build_batch("T", &batch)[0];

        assert!(!statement.has_update_clause());
        assert!(statement.sql().ends_with("ON DUPLICATE KEY UPDATE "));
    }

    #[test]
    fn numeric_values_render_through_their_display_form() {
        let batch = batch(
            &["TradeVolume", "Close"],
            vec![vec![Value::Int(31000), Value::Float(590.5)]],
        );
        let statement = &build_batch("taiwan_stock_price", &batch)[0];

        assert_eq!(
            statement.sql(),
            r#"INSERT INTO `taiwan_stock_price` (`TradeVolume`,`Close`) VALUES ("31000","590.5") ON DUPLICATE KEY UPDATE `TradeVolume` = "31000", `Close` = "590.5""#
        );
    }

    #[test]
    fn update_clause_round_trips_non_empty_columns() {
        let columns = ["StockID", "Open", "Close", "Change"];
        let batch = batch(
            &columns,
            vec![vec![
                Value::from("2330"),
                Value::from("593"),
                Value::from(""),
                Value::from("-3"),
            ]],
        );
        let statement = &build_batch("taiwan_stock_price", &batch)[0];

        // Parse the update clause back into a column -> value mapping.
        let (_, update) = statement
            .sql()
            .split_once("ON DUPLICATE KEY UPDATE ")
            .unwrap();
        let parsed: BTreeMap<&str, &str> = update
            .split(", ")
            .map(|pair| {
                let (column, value) = pair.split_once(" = ").unwrap();
                (
                    column.trim_matches('`'),
                    value.trim_matches('"'),
                )
            })
            .collect();

        let expected: BTreeMap<&str, &str> =
            [("StockID", "2330"), ("Open", "593"), ("Change", "-3")]
                .into_iter()
                .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn bulk_insert_chunks_by_row_count() {
        let rows = (0..5)
            .map(|i| vec![Value::Int(i), Value::from("x")])
            .collect();
        let batch = batch(&["ID", "Flag"], rows);

        let chunks = build_bulk_insert("T", &batch, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks[0],
            r#"INSERT INTO `T` (`ID`,`Flag`) VALUES ("0","x"),("1","x")"#
        );
        assert_eq!(chunks[2], r#"INSERT INTO `T` (`ID`,`Flag`) VALUES ("4","x")"#);
    }

    #[test]
    fn bulk_insert_of_an_empty_batch_renders_nothing() {
        let batch = batch(&["ID"], vec![]);
        assert!(build_bulk_insert("T", &batch, BULK_CHUNK_ROWS).is_empty());
    }
}
