use crate::domain::model::Params;
use crate::utils::error::{HubError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::Path;

/// The shared message line every page writes device errors and
/// confirmations into.
pub trait StatusArea: Send + Sync {
    fn clear(&self);
    fn show(&self, message: &str);
    fn current(&self) -> String;
}

/// Raw reply to a POST or PUT. The firmware answers most writes with plain
/// text, so decoding JSON is left to callers that expect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(HubError::SerializationError)
    }
}

/// A local file headed for `/upload-file`.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// GET with `params` as the query string; the JSON body on success.
    async fn get(&self, path: &str, params: &Params) -> Result<serde_json::Value>;

    /// POST with `params` as form fields; shows `success_message` on success.
    async fn post(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply>;

    /// PUT with `params` as form fields; shows `success_message` on success.
    async fn put(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply>;

    /// Multipart upload into the device directory `destination`.
    async fn upload(&self, file: FileUpload, destination: &str) -> Result<()>;

    /// Streams the device file `path` into `local`; returns the bytes written.
    /// `local` is only created once the device has accepted the request.
    async fn download(&self, path: &str, local: &Path) -> Result<u64>;

    fn status(&self) -> &dyn StatusArea;
}
