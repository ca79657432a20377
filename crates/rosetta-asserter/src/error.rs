/// Errors raised while building an asserter or checking a response against it.
#[derive(Debug, thiserror::Error)]
pub enum AsserterError {
    /// A required identifier, reference, or message was absent.
    #[error("{0} is missing")]
    MissingField(&'static str),

    /// A present value failed a sanity bound.
    #[error("{field} is invalid: {reason}")]
    ImplausibleValue { field: &'static str, reason: String },

    /// An allow-list repeats a value that must be unique.
    #[error("{list} contains a duplicate {value}")]
    DuplicateEntry { list: &'static str, value: String },

    /// An allow-list that must be non-empty was empty.
    #[error("no {0} found")]
    EmptyRequiredSet(&'static str),

    /// The snapshot file could not be read or parsed.
    #[error("failed to load snapshot: {0}")]
    SnapshotLoad(String),

    /// The snapshot file could not be written.
    #[error("failed to write snapshot: {0}")]
    SnapshotWrite(String),

    /// A response used a value the server never declared.
    #[error("{value} is not declared in {list}")]
    NotDeclared { list: &'static str, value: String },

    /// A response error used a declared code with an undeclared shape.
    #[error("error code {code} does not match declaration: {reason}")]
    ErrorMismatch { code: i32, reason: String },

    /// A response was for a different network than the asserter accepted.
    #[error("network {found} does not match {expected}")]
    NetworkMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, AsserterError>;
