//! SDK Resource Bundle Abstraction
//!
//! The chat widget ships as a packaged web application. Each platform stores
//! it differently (an SPM resource bundle, Android assets, a directory next
//! to a desktop binary), so locating it is a host capability.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::{BridgeError, Result};

/// Name of the entry document inside the bundle.
pub const INDEX_HTML: &str = "index.html";

/// Resource bundle trait
#[async_trait]
pub trait ResourceBundle: Send + Sync {
    /// Read a resource by its bundle-relative name.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ResourceNotFound`] when the bundle has no such
    /// resource.
    async fn read(&self, name: &str) -> Result<Bytes>;

    /// Root URL of the bundle, used as the base URL for relative assets.
    fn base_url(&self) -> Result<Url>;

    /// Read a resource as UTF-8 text.
    async fn read_to_string(&self, name: &str) -> Result<String> {
        let bytes = self.read(name).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            BridgeError::OperationFailed(format!("Resource {} is not UTF-8: {}", name, e))
        })
    }
}
