use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Record is missing field `{field}` required by dataset `{dataset}`")]
    MissingField {
        dataset: &'static str,
        field: &'static str,
    },

    #[error("Field `{field}` expected {expected} but got {got}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error(transparent)]
    Shape(#[from] CoreError),
}
