//! Run configuration, read from an optional `arkg.toml`.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! ontology_dir  = "ontology"
//! output_dir    = "triples"
//! basename      = "graph"
//! formats       = ["ttl", "jsonld", "nt"]
//! edge_keying   = "pair"
//! chunk_size    = 1500
//! extra_markers = []
//!
//! [custom_predicates]
//! hasAuthor = "له مؤلف"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::graph::EdgeKeying;

/// Default chunk length (in characters) for [`crate::text::chunk_text`].
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Settings shared by the library entry points and the client binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the `*.tbox.ttl` schema templates.
    pub ontology_dir: PathBuf,
    /// Directory receiving exported artifacts.
    pub output_dir: PathBuf,
    /// File stem of exported artifacts (`<basename>.ttl`, ...).
    pub basename: String,
    /// Formats written when the caller does not request a subset.
    pub formats: Vec<ExportFormat>,
    /// How graph edges are keyed.
    pub edge_keying: EdgeKeying,
    /// Maximum chunk length for sentence packing.
    pub chunk_size: usize,
    /// Event markers added to the built-in set.
    pub extra_markers: Vec<String>,
    /// Allowed predicates (key → gloss) for the `other` theme.
    pub custom_predicates: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ontology_dir: PathBuf::from("ontology"),
            output_dir: PathBuf::from("triples"),
            basename: "graph".to_owned(),
            formats: ExportFormat::ALL.to_vec(),
            edge_keying: EdgeKeying::Pair,
            chunk_size: DEFAULT_CHUNK_SIZE,
            extra_markers: Vec::new(),
            custom_predicates: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML or contains
    /// unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
