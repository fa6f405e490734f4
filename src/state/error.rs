use thiserror::Error;

/// Structural problems found while installing a dataset. A failed load leaves
/// the previously installed data untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Row {index} has no identifier field")]
    MissingIdentifier { index: usize },

    #[error("Row {index} has an identifier that is not a non-empty string")]
    InvalidIdentifier { index: usize },

    #[error("Duplicate row identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("Row {index} is not a JSON object")]
    RowNotAnObject { index: usize },

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Malformed dataset: {0}")]
    Malformed(String),
}
