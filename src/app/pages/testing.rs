use crate::core::status::MemoryStatus;
use crate::core::{DeviceApi, FileUpload, Params, Reply, StatusArea};
use crate::utils::error::{HubError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub message: Option<String>,
    pub params: Params,
}

/// In-memory device: canned GET payloads keyed by path, every call recorded.
#[derive(Clone, Default)]
pub struct RecordingApi {
    responses: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    replies: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    status: MemoryStatus,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond(&self, path: &str, value: serde_json::Value) {
        self.responses.lock().await.insert(path.to_string(), value);
    }

    /// Body answered to POSTs on `path`; "OK" otherwise.
    pub async fn reply_with(&self, path: &str, body: &str) {
        self.replies
            .lock()
            .await
            .insert(path.to_string(), body.to_string());
    }

    async fn reply_for(&self, path: &str) -> Reply {
        let body = self
            .replies
            .lock()
            .await
            .get(path)
            .cloned()
            .unwrap_or_else(|| "OK".to_string());
        Reply { status: 200, body }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn uploaded(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(key).cloned()
    }

    async fn record(&self, method: &'static str, path: &str, message: Option<&str>, params: &Params) {
        self.calls.lock().await.push(Call {
            method,
            path: path.to_string(),
            message: message.map(str::to_string),
            params: params.clone(),
        });
    }
}

#[async_trait]
impl DeviceApi for RecordingApi {
    async fn get(&self, path: &str, params: &Params) -> Result<serde_json::Value> {
        self.record("GET", path, None, params).await;
        self.responses
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| HubError::DeviceError {
                status: 404,
                body: String::new(),
            })
    }

    async fn post(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply> {
        self.record("POST", path, Some(success_message), params).await;
        self.status.show(success_message);
        Ok(self.reply_for(path).await)
    }

    async fn put(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply> {
        self.record("PUT", path, Some(success_message), params).await;
        self.status.show(success_message);
        Ok(Reply {
            status: 200,
            body: "OK".to_string(),
        })
    }

    async fn upload(&self, file: FileUpload, destination: &str) -> Result<()> {
        let params = Params::new().with("upfile", &file.file_name);
        self.record("UPLOAD", destination, None, &params).await;
        self.files
            .lock()
            .await
            .insert(format!("{}/{}", destination, file.file_name), file.contents);
        self.status.show("File uploaded!");
        Ok(())
    }

    async fn download(&self, path: &str, local: &Path) -> Result<u64> {
        self.record("DOWNLOAD", path, None, &Params::new()).await;
        let contents = self
            .files
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| HubError::DeviceError {
                status: 400,
                body: "File doesn't exist".to_string(),
            })?;
        tokio::fs::write(local, &contents).await?;
        Ok(contents.len() as u64)
    }

    fn status(&self) -> &dyn StatusArea {
        &self.status
    }
}
