use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// True when the store could not be reached at all, as opposed to a
    /// query that reached the store and failed there
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_) | StoreError::Connection(_) | StoreError::Timeout(_)
        )
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::DnsResolve { .. } => StoreError::Connection(err.to_string()),
            ErrorKind::InvalidArgument { .. } => StoreError::Config(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}
