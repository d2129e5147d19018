//! Route registration errors.
//!
//! Every variant describes a defect in the route table itself, so callers are
//! expected to abort setup on the first one rather than retry.

use thiserror::Error;

/// Failure to register a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("path must begin with '/' in path '{path}'")]
    MissingLeadingSlash { path: String },

    #[error("HTTP method can not be empty")]
    EmptyMethod,

    #[error("invalid HTTP method '{method}'")]
    InvalidMethod { method: String },

    #[error("there must be at least one handler for path '{path}'")]
    EmptyHandlers { path: String },

    #[error("only one wildcard per path segment is allowed, has: '{wildcard}' in path '{path}'")]
    MultipleWildcards { wildcard: String, path: String },

    #[error("wildcards must be named with a non-empty name in path '{path}'")]
    UnnamedWildcard { path: String },

    #[error("catch-all routes are only allowed at the end of the path in path '{path}'")]
    MisplacedCatchAll { path: String },

    #[error("no / before catch-all in path '{path}'")]
    MalformedCatchAll { path: String },

    #[error(
        "'{segment}' in new path '{path}' conflicts with existing wildcard '{wildcard}' in existing prefix '{prefix}'"
    )]
    WildcardConflict {
        segment: String,
        path: String,
        wildcard: String,
        prefix: String,
    },

    #[error(
        "catch-all wildcard '{wildcard}' in new path '{path}' conflicts with existing path segment '{segment}' in existing prefix '{prefix}'"
    )]
    CatchAllConflict {
        wildcard: String,
        path: String,
        segment: String,
        prefix: String,
    },

    #[error("route already exists: {method} {path} with handlers: {existing}")]
    DuplicateRoute {
        method: String,
        path: String,
        existing: String,
    },
}

/// Result type alias for route registration.
pub type Result<T> = std::result::Result<T, RouteError>;
