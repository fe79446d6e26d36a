//! Resource Bundle Implementation backed by a directory

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    resources::ResourceBundle,
};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use url::Url;

/// Serves the packaged web widget from a directory on disk.
///
/// The directory is the bundle root: `index.html` lives directly inside it
/// and relative asset URLs resolve against it.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    /// Create a bundle rooted at `root`.
    ///
    /// # Errors
    ///
    /// Fails when the directory does not exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = std::fs::canonicalize(root.as_ref()).map_err(|e| {
            BridgeError::ResourceNotFound(format!("{}: {}", root.as_ref().display(), e))
        })?;

        if !root.is_dir() {
            return Err(BridgeError::ResourceNotFound(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(BridgeError::ResourceNotFound(format!(
                "{} is outside the bundle",
                name
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceBundle for DirectoryBundle {
    async fn read(&self, name: &str) -> Result<Bytes> {
        let path = self.resolve(name)?;
        debug!(resource = name, "Reading bundled resource");

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BridgeError::ResourceNotFound(name.to_string()))
            }
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    fn base_url(&self) -> Result<Url> {
        Url::from_directory_path(&self.root).map_err(|_| {
            BridgeError::OperationFailed(format!(
                "Bundle root {} cannot be expressed as a file URL",
                self.root.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::resources::INDEX_HTML;

    fn temp_bundle(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "chatwoot-bundle-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(INDEX_HTML), "<html><body>chat</body></html>").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_reads_index_html() {
        let dir = temp_bundle("read");
        let bundle = DirectoryBundle::new(&dir).unwrap();

        let html = bundle.read_to_string(INDEX_HTML).await.unwrap();
        assert!(html.contains("chat"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_resource() {
        let dir = temp_bundle("missing");
        let bundle = DirectoryBundle::new(&dir).unwrap();

        assert!(matches!(
            bundle.read("nope.js").await,
            Err(BridgeError::ResourceNotFound(_))
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_rejects_parent_traversal() {
        let dir = temp_bundle("traversal");
        let bundle = DirectoryBundle::new(&dir).unwrap();

        assert!(matches!(
            bundle.read("../secret.txt").await,
            Err(BridgeError::ResourceNotFound(_))
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_base_url_is_directory_url() {
        let dir = temp_bundle("base");
        let bundle = DirectoryBundle::new(&dir).unwrap();

        let url = bundle.base_url().unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with('/'));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(DirectoryBundle::new("/definitely/not/a/bundle").is_err());
    }
}
