use thiserror::Error;

/// Convenient result alias for the navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when connections are supplied but there is nothing to connect them to.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A segment or connection refers to an entity that is not in the snapshot.
    ///
    /// Reported through the log while building; the offending record is skipped.
    #[error("{entity} {id} refers to a missing entity")]
    MissingReference { entity: &'static str, id: String },

    /// Raised when a start or goal vertex is not part of the built graph.
    #[error("vertex {key} not found in graph")]
    VertexNotFound { key: String },

    /// Raised when a vertex on a reconstructed path lacks usable coordinates.
    #[error("vertex {vertex} on route has no usable coordinates")]
    MalformedVertex { vertex: String },

    /// Raised when the search exhausted the graph without reaching the goal.
    #[error("no route found between {start} and {goal}")]
    NoPathFound { start: String, goal: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for snapshot decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
