use crate::error::CoreError;
use crate::value::Value;

/// One record destined for a single table.
///
/// Values are positional: the owning batch's column list gives them their
/// names. A `Row` never exists outside a batch in the upload path.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// An ordered sequence of rows sharing one column list and one destination
/// table. May be empty, in which case an upload is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Batch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Rejects rows whose arity disagrees with the column
    /// list; statement generation is positional and must never see a
    /// misaligned row.
    pub fn push(&mut self, row: Row) -> Result<(), CoreError> {
        if row.len() != self.columns.len() {
            return Err(CoreError::ShapeMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
