//! Error types

mod field;
mod service;
mod table;

pub use field::*;
pub use service::*;
pub use table::*;

/// Crate-level error covering every fallible operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Record field access or flattening failed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// An interaction with the table view model was invalid.
    #[error(transparent)]
    Table(#[from] TableError),

    /// A collaborator service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err = Error::from(TableError::out_of_range(7, 3));
        assert_eq!(err.to_string(), "Row position 7 out of range for 3 rows");
        assert!(matches!(err, Error::Table(TableError::PositionOutOfRange { .. })));

        let err = Error::from(ServiceError::Unconfigured("objectName"));
        assert_eq!(err.to_string(), "Missing required setting 'objectName'");
    }
}
