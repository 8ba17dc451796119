use thiserror::Error;

/// Errors produced by engine operations and the request router.
///
/// Every error is local to one operation on one instance. An operation that
/// fails leaves the instance exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A bounded structure is at its fixed maximum.
    #[error("{structure} overflow: capacity of {capacity} reached")]
    CapacityExceeded {
        /// Human-readable structure name, e.g. "Stack".
        structure: &'static str,
        /// The fixed capacity that was hit.
        capacity: usize,
    },
    /// Pop, peek or dequeue on an empty bounded structure.
    #[error("{0} is empty")]
    EmptyStructure(&'static str),
    /// Unknown instance identifier or unknown route.
    #[error("{what} '{id}' not found")]
    NotFound {
        /// What was looked up, e.g. "Stack" or "Route".
        what: String,
        /// The identifier that failed to resolve.
        id: String,
    },
    /// A linear-probing table has no free slot for a new key.
    #[error("Hash table is full ({0} slots occupied)")]
    TableFull(usize),
    /// A request carried a value of the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A known route was requested with the wrong method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// The method that was used.
        method: String,
        /// The requested path.
        path: String,
    },
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with a formatted message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for an [`Error::NotFound`].
    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }

    /// HTTP-style status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::CapacityExceeded { .. }
            | Self::EmptyStructure(_)
            | Self::TableFull(_)
            | Self::InvalidInput(_) => 400,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(Error::not_found("Stack", "s1").status(), 404);
        assert_eq!(Error::EmptyStructure("Stack").status(), 400);
        assert_eq!(Error::TableFull(4).status(), 400);
        assert_eq!(
            Error::MethodNotAllowed {
                method: "GET".into(),
                path: "/api/stack/s1/push".into()
            }
            .status(),
            405
        );
    }

    #[test]
    fn messages() {
        let err = Error::CapacityExceeded {
            structure: "Stack",
            capacity: 10,
        };
        assert_eq!(err.to_string(), "Stack overflow: capacity of 10 reached");
        assert_eq!(
            Error::not_found("Queue", "q").to_string(),
            "Queue 'q' not found"
        );
    }
}
