use std::error;
use std::fmt;

/// Represents an error while describing, dispatching, or decoding a
/// request.
///
/// Failures reported by the transport collaborator are carried in
/// [`Error::Transport`] and propagate out of the verb methods untouched.
/// The one deliberate exception is
/// [`Request::exists`](crate::Request::exists), which swallows them and
/// answers `false`.
#[derive(Debug)]
pub enum Error {
    /// The transport failed before producing a response: connection
    /// refused, DNS failure, TLS problems, a timeout, or an option set it
    /// could not express to its engine (a bad URL, an unusable method).
    Transport(Box<dyn error::Error + Send + Sync + 'static>),
    /// A body could not be serialized to JSON, or a response body could
    /// not be deserialized into the requested type.
    Json(serde_json::Error),
}

impl Error {
    /// Wraps a transport-level failure.
    ///
    /// Exists so [`Transport`](crate::Transport) implementations outside
    /// this crate can signal errors without growing the enum.
    pub fn transport<E>(err: E) -> Error
    where
        E: error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;
        match self {
            Transport(err) => write!(f, "{}", err),
            Json(err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use Error::*;
        match self {
            Transport(err) => Some(err.as_ref()),
            Json(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn transport_errors_keep_their_source() {
        let err = Error::transport(io::Error::new(io::ErrorKind::Other, "refused"));
        assert_eq!(err.to_string(), "refused");
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn json_errors_keep_their_source() {
        let cause = serde_json::from_str::<i64>("not a number").unwrap_err();
        let err = Error::Json(cause);
        assert!(error::Error::source(&err).is_some());
    }
}
