use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Errors that can occur while building or querying a [crate::sam::SamEngine].
#[derive(Debug)]
pub enum SamError {
    /// A caller passed a disallowed argument, e.g. a `maxlen_limit` of `0` or `1`.
    Domain(String),

    /// An operation was invoked in the wrong engine phase: a query before
    /// `finalize`, an `append` after `finalize`, or a second `finalize`.
    State(String),

    /// The state arena could not allocate another state.
    Capacity(String),
}

impl Display for SamError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Domain(message) => write!(f, "domain error: {message}"),
            Self::State(message) => write!(f, "state error: {message}"),
            Self::Capacity(message) => write!(f, "capacity error: {message}"),
        }
    }
}

impl Error for SamError {}

/// A type alias for any kind of error. The error is boxed and must be `Send`, `Sync`, and `'static`.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A type alias for a `Result` with a [BoxError].
pub type BoxResult<T> = Result<T, BoxError>;
