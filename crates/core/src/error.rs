/// Domain errors surfaced to callers of the lock core.
///
/// Collaborator failures are NOT represented here: they are absorbed by the
/// resolvers (fail-open) and only ever appear as [`LookupError`] values in
/// logs.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of an external lookup (contact, activity, relationship, settings).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The request never produced a response (network, DNS, TLS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("lookup timed out")]
    Timeout,

    /// A response arrived but could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The backing system answered with an explicit error.
    #[error("backend error ({code}): {message}")]
    Api { code: String, message: String },
}
