use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Row carries {got} values but the batch defines {expected} columns")]
    ShapeMismatch { expected: usize, got: usize },
}
