use crate::core::request::decode;
use crate::core::{DeviceApi, FileUpload, Params};
use crate::domain::model::{FileList, FreeSpace};
use crate::utils::error::{HubError, Result};
use std::path::Path;

pub const FILE_DELETED_MESSAGE: &str = "File deleted!";
pub const DEFAULT_LIST_ROOT: &str = "/";
pub const DEFAULT_LIST_DEPTH: u32 = 5;
pub const DEFAULT_UPLOAD_DESTINATION: &str = "/www";

/// File listing and free space, as shown after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSnapshot {
    pub files: FileList,
    pub free: FreeSpace,
}

/// The hub's file system: listing, upload, download and delete.
pub struct StoragePage<'a, A: DeviceApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: DeviceApi + ?Sized> StoragePage<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn free_space(&self) -> Result<FreeSpace> {
        let value = self.api.get("/freeSpace", &Params::new()).await?;
        decode("/freeSpace", value)
    }

    pub async fn list_files(&self, path: &str, depth: u32) -> Result<FileList> {
        let params = Params::new().with("path", path).with("depth", depth);
        let value = self.api.get("/list", &params).await?;
        decode("/list", value)
    }

    pub async fn snapshot(&self) -> Result<StorageSnapshot> {
        let files = self.list_files(DEFAULT_LIST_ROOT, DEFAULT_LIST_DEPTH).await?;
        let free = self.free_space().await?;
        Ok(StorageSnapshot { files, free })
    }

    /// Deletes `path` on the device and returns the free space afterwards.
    pub async fn delete_file(&self, path: &str) -> Result<FreeSpace> {
        tracing::info!("🗑️  Deleting {}", path);
        let params = Params::new().with("path", path);
        self.api.post("/delete", FILE_DELETED_MESSAGE, &params).await?;
        self.free_space().await
    }

    /// Uploads a local file into `destination` and refreshes the listing.
    pub async fn upload(&self, local: &Path, destination: &str) -> Result<StorageSnapshot> {
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| HubError::FormError {
                field: "file".to_string(),
                reason: format!("'{}' has no usable file name", local.display()),
            })?
            .to_string();
        let contents = tokio::fs::read(local).await?;

        self.api
            .upload(
                FileUpload {
                    file_name,
                    contents,
                },
                destination,
            )
            .await?;
        self.snapshot().await
    }

    /// Saves a device file locally; returns the number of bytes written.
    pub async fn download(&self, path: &str, local: &Path) -> Result<u64> {
        if let Some(parent) = local.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let written = self.api.download(path, local).await?;
        tracing::info!("⬇️  Saved {} ({} bytes) to {}", path, written, local.display());
        Ok(written)
    }
}
