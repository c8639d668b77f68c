//! Error type shared by every stage of the library.

use std::path::PathBuf;

/// Errors raised while resolving ontology profiles, loading configuration,
/// or reading and writing artifacts.
///
/// Candidate triples that violate the ontology are never reported here:
/// the filter drops them silently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The theme is not one of `event`, `cultural`, `other`.
    #[error("unknown theme: {0:?} (expected one of: event, cultural, other)")]
    UnknownTheme(String),

    /// Theme `other` was requested without a user ontology class.
    #[error("theme 'other' requires a user-supplied ontology class")]
    MissingUserClass,

    /// An export format name is not one of `ttl`, `jsonld`, `nt`.
    #[error("unknown export format: {0:?} (expected one of: ttl, jsonld, nt)")]
    UnknownFormat(String),

    /// A filesystem read or write failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external collaborator (triple generator, predicate lookup) failed.
    #[error("collaborator failed: {0}")]
    Collaborator(String),

    /// A JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
