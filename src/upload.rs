/*!
 * Uploader seam for finished clip assets.
 *
 * The pipeline hands every finalized asset to an [`Uploader`] together with
 * a key derived from the movie identifier and file name. Transport, retry
 * and authentication live behind this trait, outside the core.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::fmt::Debug;
use std::path::Path;

/// Common trait for asset uploaders
///
/// This trait defines the interface the pipeline uses to push produced
/// assets to remote storage. Implementations are called once per finalized
/// asset; a failure is surfaced to the caller but never retried here.
#[async_trait]
pub trait Uploader: Send + Sync + Debug {
    /// Upload one local asset under the given remote key
    ///
    /// # Arguments
    /// * `local` - Path of the finalized asset on disk
    /// * `key` - Remote key, `<movie id>/<file name>`
    ///
    /// # Returns
    /// * `Result<()>` - Ok if the asset was accepted, or an error
    async fn upload(&self, local: &Path, key: &str) -> Result<()>;
}

/// Uploader that only announces the destination.
///
/// Used for the `--s3` surface: the core records where each asset would go
/// and leaves the actual transfer to an external collaborator.
#[derive(Debug)]
pub struct AnnouncingUploader {
    /// Remote base URL the assets are destined for
    pub destination: String,
}

impl AnnouncingUploader {
    /// Create an uploader announcing against the given destination URL
    pub fn new(destination: String) -> Self {
        AnnouncingUploader { destination }
    }
}

#[async_trait]
impl Uploader for AnnouncingUploader {
    async fn upload(&self, local: &Path, key: &str) -> Result<()> {
        info!(
            "Asset ready for upload: {} -> {}/{}",
            local.display(),
            self.destination.trim_end_matches('/'),
            key
        );
        Ok(())
    }
}

/// Build the remote key for an asset: `<movie id>/<file name>`.
pub fn asset_key(movie_id: &str, local: &Path) -> String {
    let file_name = local
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}/{}", movie_id, file_name)
}
