use std::path::{Path, PathBuf};

use crate::{error::CacheError, types::TokenRecord};

/// Single-file store for the one [`TokenRecord`] of this instance.
///
/// The record is written as pretty JSON and replaced wholesale on every
/// [`persist`](TokenCache::persist). Nothing deletes it except
/// [`clear`](TokenCache::clear).
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached record. A missing file yields `Ok(None)`.
    pub async fn load(&self) -> Result<Option<TokenRecord>, CacheError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(e)),
        };
        let token: TokenRecord = serde_json::from_str(&content)?;
        Ok(Some(token))
    }

    pub async fn persist(&self, token: &TokenRecord) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        // write then rename; readers never see a partial record
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Removes the cached record. Clearing an empty cache is not an error.
    pub async fn clear(&self) -> Result<(), CacheError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }
}
