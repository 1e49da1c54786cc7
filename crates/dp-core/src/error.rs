/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying a roster.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No actor with the given name is on the roster.
    #[error("actor not found: \"{0}\"")]
    ActorNotFound(String),

    /// An actor with the same name already exists.
    #[error("actor already exists: \"{0}\"")]
    DuplicateName(String),

    /// A trait value on a sheet is outside its legal range.
    #[error("invalid value for '{name}' on {actor}: {value}")]
    InvalidTrait {
        /// The actor's display name.
        actor: String,
        /// The trait name.
        name: String,
        /// The rejected value.
        value: i32,
    },

    /// The roster file could not be parsed.
    #[error("invalid roster: {0}")]
    InvalidRoster(#[from] serde_json::Error),
}
