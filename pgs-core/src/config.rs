//! Export configuration.
//!
//! Persisted as YAML; every key is optional. A missing file yields
//! [`ExportConfig::default`], mirroring how the registry treats a first run.
//!
//! ```yaml
//! publication_groups: [PGP000244, PGP000263]
//! score_limit: 5
//! prior:
//!   kind: local
//!   location: /data/ftp/pgs
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::PublicationId;

/// Publications large enough to get their own metadata bundle.
pub const DEFAULT_PUBLICATION_GROUPS: &[&str] =
    &["PGP000244", "PGP000263", "PGP000332", "PGP000393"];

/// Where the previously published tree can be read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum PriorSource {
    /// A directory on the local filesystem.
    Local(PathBuf),
    /// An HTTP(S) base URL exposing the same tree.
    Http(String),
}

/// Export and publish settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_publication_groups")]
    pub publication_groups: Vec<PublicationId>,
    /// Restrict per-score and catalog-wide bundles to the first N scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior: Option<PriorSource>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            publication_groups: default_publication_groups(),
            score_limit: None,
            prior: None,
        }
    }
}

fn default_publication_groups() -> Vec<PublicationId> {
    DEFAULT_PUBLICATION_GROUPS
        .iter()
        .map(|id| PublicationId::from(*id))
        .collect()
}

impl ExportConfig {
    /// Load the config at `path`, or the defaults when the file is absent.
    pub fn load_at(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        serde_yaml::from_str(&contents).map_err(|e| CoreError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
