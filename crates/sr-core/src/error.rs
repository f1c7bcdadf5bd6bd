/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while registering generated content into the world.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The payload does not carry the array the handler expects.
    #[error("payload is missing the \"{0}\" array")]
    MissingKey(&'static str),

    /// The expected array is present but its contents do not fit the schema.
    #[error("invalid \"{key}\" payload: {source}")]
    InvalidPayload {
        /// The top-level key being parsed.
        key: &'static str,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}
