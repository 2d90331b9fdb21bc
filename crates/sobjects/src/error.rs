/// A record could not be turned into its tagged wire form.
///
/// These are capability violations in the caller's record type and are
/// always raised before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The record failed to serialize.
    #[error("record of type '{type_name}' failed to serialize: {source}")]
    Serialize {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record did not serialize to a JSON object.
    #[error("record of type '{type_name}' must serialize to a JSON object, got {found}")]
    NotAnObject { type_name: String, found: &'static str },

    /// The serialized record has no `attributes.type` slot, or the slot does
    /// not hold the tagged name (the envelope was skipped or renamed).
    #[error("record of type '{type_name}' does not expose a writable attributes.type envelope")]
    MissingEnvelope { type_name: String },
}

/// A collection response did not match the request it answers.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body was not an array of outcome entries.
    #[error("response is not a list of outcome entries: {0}")]
    Shape(#[from] serde_json::Error),

    /// The response has a different number of entries than the request had records.
    #[error("response has {actual} entries for {expected} records")]
    LengthMismatch { expected: usize, actual: usize },

    /// A successful entry carries no id.
    #[error("entry {index} reports success without an id")]
    MissingId { index: usize },

    /// A successful entry carries errors.
    #[error("entry {index} reports success with {count} error(s)")]
    SuccessWithErrors { index: usize, count: usize },
}
