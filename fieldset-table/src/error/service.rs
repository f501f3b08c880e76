//! Collaborator service errors

/// Errors reported by the query, field set and save services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Reading or writing a backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested field set does not exist.
    #[error("Field set '{field_set}' not found on {object}")]
    FieldSetNotFound { object: String, field_set: String },

    /// A setting the request needs is not configured.
    #[error("Missing required setting '{0}'")]
    Unconfigured(&'static str),

    /// The service refused the request.
    #[error("Service rejected request: {message}")]
    Rejected {
        /// Message returned by the service.
        message: String,
    },
}

impl ServiceError {
    /// Creates a new rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a new missing field set error.
    pub fn field_set_not_found(object: impl Into<String>, field_set: impl Into<String>) -> Self {
        Self::FieldSetNotFound {
            object: object.into(),
            field_set: field_set.into(),
        }
    }

    /// Returns `true` if the failure came from the service itself rather than transport.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::FieldSetNotFound { .. })
    }
}
