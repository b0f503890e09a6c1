//! Destination stores: where the previously published tree is read from.
//!
//! Paths are logical, `/`-separated and relative to the tree root
//! (`scores/PGS000001/Metadata/PGS000001_metadata.xlsx`). A missing file is
//! `Ok(None)`, never an error; that is how a first publication is detected.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use pgs_core::digest::{md5_bytes, md5_file, Md5Digest};
use pgs_core::PriorSource;

use crate::error::{io_err, PublishError};
use crate::layout;

/// Narrow view of a published tree.
pub trait DestinationStore {
    fn exists(&self, path: &str) -> Result<bool, PublishError>;

    /// File contents, or `None` when the file does not exist.
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>, PublishError>;

    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), PublishError>;

    /// Entry names directly under `path`, sorted. Empty when `path` is absent.
    fn list_children(&self, path: &str) -> Result<Vec<String>, PublishError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    fn fetch_bytes(&self, path: &str) -> Result<Option<Vec<u8>>, PublishError> {
        self.read(path)
    }

    fn checksum_of(&self, path: &str) -> Result<Option<Md5Digest>, PublishError> {
        Ok(self.read(path)?.map(|bytes| md5_bytes(&bytes)))
    }
}

/// Open the store configured by `source`.
pub fn open_store(source: &PriorSource) -> Box<dyn DestinationStore> {
    match source {
        PriorSource::Local(root) => Box::new(LocalStore::new(root)),
        PriorSource::Http(base) => Box::new(HttpStore::new(base)),
    }
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

/// A tree on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        layout::to_path(&self.root, path)
    }
}

impl DestinationStore for LocalStore {
    fn exists(&self, path: &str) -> Result<bool, PublishError> {
        Ok(self.resolve(path).exists())
    }

    fn read(&self, path: &str) -> Result<Option<Vec<u8>>, PublishError> {
        let full = self.resolve(path);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(full, e)),
        }
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), PublishError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(&full, bytes).map_err(|e| io_err(full, e))
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, PublishError> {
        let full = self.resolve(path);
        let entries = match std::fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(full, e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&full, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    /// Hashes in blocks instead of reading the whole file.
    fn checksum_of(&self, path: &str) -> Result<Option<Md5Digest>, PublishError> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Ok(None);
        }
        Ok(Some(md5_file(&full)?))
    }
}

// ---------------------------------------------------------------------------
// HTTP (read-only)
// ---------------------------------------------------------------------------

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// A published tree served over HTTP(S), e.g. the public mirror of the FTP
/// area. Read-only.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base: String,
    agent: ureq::Agent,
}

impl HttpStore {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build();
        Self { base, agent }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn get(&self, url: &str) -> Result<Option<ureq::Response>, PublishError> {
        debug!("GET {url}");
        match self.agent.get(url).call() {
            Ok(response) => Ok(Some(response)),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(PublishError::Http {
                url: url.to_string(),
                source: Box::new(e),
            }),
        }
    }
}

impl DestinationStore for HttpStore {
    fn exists(&self, path: &str) -> Result<bool, PublishError> {
        let url = self.url(path);
        match self.agent.head(&url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(PublishError::Http {
                url,
                source: Box::new(e),
            }),
        }
    }

    fn read(&self, path: &str) -> Result<Option<Vec<u8>>, PublishError> {
        let url = self.url(path);
        let Some(response) = self.get(&url)? else {
            return Ok(None);
        };
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| io_err(&url, e))?;
        Ok(Some(bytes))
    }

    fn write(&self, path: &str, _bytes: &[u8]) -> Result<(), PublishError> {
        Err(PublishError::ReadOnlyStore {
            path: self.url(path),
        })
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, PublishError> {
        let url = format!("{}/", self.url(path).trim_end_matches('/'));
        let Some(response) = self.get(&url)? else {
            return Ok(Vec::new());
        };
        let body = response.into_string().map_err(|e| io_err(&url, e))?;
        Ok(parse_index_links(&body))
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}

/// Entry names linked from an auto-generated directory index page.
fn parse_index_links(html: &str) -> Vec<String> {
    let mut names: Vec<String> = html
        .split("href=\"")
        .skip(1)
        .filter_map(|chunk| chunk.split('"').next())
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('?')
                && !href.starts_with('/')
                && !href.starts_with("..")
                && !href.contains("://")
        })
        .map(|href| href.trim_end_matches('/').to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn local_read_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        assert_eq!(store.read("scores/PGS000001/Metadata/x.xlsx").unwrap(), None);
        assert_eq!(store.checksum_of("metadata/pgs_all_metadata.xlsx").unwrap(), None);
        assert!(!store.exists("scores").unwrap());
        assert!(store.list_children("scores").unwrap().is_empty());
    }

    #[test]
    fn local_write_then_read_and_list() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        store.write("scores/PGS000002/Metadata/b.csv", b"b").unwrap();
        store.write("scores/PGS000001/Metadata/a.csv", b"abc").unwrap();

        assert_eq!(
            store.fetch_bytes("scores/PGS000001/Metadata/a.csv").unwrap(),
            Some(b"abc".to_vec())
        );
        assert_eq!(
            store.checksum_of("scores/PGS000001/Metadata/a.csv").unwrap(),
            Some(md5_bytes(b"abc"))
        );
        assert_eq!(
            store.list_children("scores").unwrap(),
            vec!["PGS000001", "PGS000002"]
        );
        assert!(tmp.path().join("scores/PGS000001/Metadata/a.csv").is_file());
    }

    #[test]
    fn http_store_is_read_only() {
        let store = HttpStore::new("https://ftp.example.org/pgs/");
        assert_eq!(
            store.url("/metadata/pgs_all_metadata.xlsx"),
            "https://ftp.example.org/pgs/metadata/pgs_all_metadata.xlsx"
        );
        let err = store.write("metadata/x", b"x").unwrap_err();
        assert!(matches!(err, PublishError::ReadOnlyStore { .. }));
    }

    #[test]
    fn index_links_skip_navigation() {
        let html = r#"<a href="?C=N;O=D">Name</a> <a href="/pub/">Parent</a>
            <a href="../">Up</a> <a href="PGS000001/">PGS000001/</a>
            <a href="PGS000001_metadata.tar.gz">tar</a> <a href="https://x.org/">ext</a>"#;
        assert_eq!(
            parse_index_links(html),
            vec!["PGS000001", "PGS000001_metadata.tar.gz"]
        );
    }

    #[test]
    fn open_store_picks_backend() {
        let local = open_store(&PriorSource::Local(PathBuf::from("/data/ftp")));
        assert_eq!(local.describe(), "/data/ftp");
        let http = open_store(&PriorSource::Http("https://ftp.example.org/pgs".into()));
        assert_eq!(http.describe(), "https://ftp.example.org/pgs");
    }
}
