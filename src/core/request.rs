use crate::core::{DeviceApi, FileUpload, Params, Reply, StatusArea};
use crate::utils::error::{HubError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Header telling `/upload-file` which directory to write into.
pub const UPLOAD_PATH_HEADER: &str = "FILE_UPLOAD_PATH";

/// Form field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "upfile";

/// Give up on a hub that does not accept the connection within this time.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the hub's web API.
///
/// Every call is a single request: no retry, no queueing. A reply outside
/// the success range has its raw body written to the status area and is
/// returned as [`HubError::DeviceError`].
#[derive(Debug, Clone)]
pub struct HttpDeviceClient<S: StatusArea> {
    client: Client,
    base_url: Url,
    status: S,
}

impl<S: StatusArea> HttpDeviceClient<S> {
    pub fn new(base_url: &str, status: S) -> Result<Self> {
        let client = Self::builder().build()?;
        Self::with_client(client, base_url, status)
    }

    /// Same as [`new`](Self::new), with `timeout` bounding each whole request.
    pub fn with_timeout(base_url: &str, timeout: Duration, status: S) -> Result<Self> {
        let client = Self::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, status)
    }

    fn builder() -> ClientBuilder {
        Client::builder().connect_timeout(CONNECT_TIMEOUT)
    }

    pub fn with_client(client: Client, base_url: &str, status: S) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url,
            status,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn form(params: &Params) -> Form {
        params
            .pairs()
            .iter()
            .fold(Form::new(), |form, (k, v)| form.text(k.clone(), v.clone()))
    }

    /// Reads the body and reports failures to the status area.
    async fn read_reply(&self, method: &Method, path: &str, response: reqwest::Response) -> Result<Reply> {
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📡 {} {} -> {}", method, path, status);

        if !status.is_success() {
            tracing::warn!("{} {} failed with {}: {}", method, path, status, body);
            self.status.show(&body);
            return Err(HubError::DeviceError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_form(
        &self,
        method: Method,
        path: &str,
        success_message: &str,
        params: &Params,
    ) -> Result<Reply> {
        self.status.clear();

        let mut request = self.client.request(method.clone(), self.endpoint(path)?);
        if !params.is_empty() {
            request = request.multipart(Self::form(params));
        }

        tracing::debug!("📡 {} {} with {} field(s)", method, path, params.len());
        let response = request.send().await?;
        let reply = self.read_reply(&method, path, response).await?;

        self.status.show(success_message);
        Ok(reply)
    }
}

#[async_trait]
impl<S: StatusArea> DeviceApi for HttpDeviceClient<S> {
    async fn get(&self, path: &str, params: &Params) -> Result<serde_json::Value> {
        let mut request = self.client.get(self.endpoint(path)?);
        if !params.is_empty() {
            request = request.query(params.pairs());
        }

        tracing::debug!("📡 GET {}", params.append_to(path));
        let response = request.send().await?;
        let reply = self.read_reply(&Method::GET, path, response).await?;

        if reply.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&reply.body).map_err(|e| HubError::ResponseError {
            path: path.to_string(),
            message: format!("invalid JSON: {}", e),
        })
    }

    async fn post(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply> {
        self.send_form(Method::POST, path, success_message, params).await
    }

    async fn put(&self, path: &str, success_message: &str, params: &Params) -> Result<Reply> {
        self.send_form(Method::PUT, path, success_message, params).await
    }

    async fn upload(&self, file: FileUpload, destination: &str) -> Result<()> {
        let size = file.contents.len();
        let part = Part::bytes(file.contents).file_name(file.file_name.clone());
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!("⬆️  Uploading {} ({} bytes) to {}", file.file_name, size, destination);
        let response = self
            .client
            .post(self.endpoint("/upload-file")?)
            .header(UPLOAD_PATH_HEADER, destination)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📡 POST /upload-file -> {}", status);

        match status {
            StatusCode::INSUFFICIENT_STORAGE => {
                self.status.show("Not enough free storage for file!");
                Err(HubError::InsufficientStorage)
            }
            StatusCode::CREATED => {
                self.status.show("File uploaded!");
                Ok(())
            }
            other => {
                self.status.show(&body);
                Err(HubError::DeviceError {
                    status: other.as_u16(),
                    body,
                })
            }
        }
    }

    async fn download(&self, path: &str, local: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(self.endpoint("/download")?)
            .query(&[("path", path)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 GET /download?path={} -> {}", path, status);
        if !status.is_success() {
            let body = response.text().await?;
            self.status.show(&body);
            return Err(HubError::DeviceError {
                status: status.as_u16(),
                body,
            });
        }

        // 只有在裝置回覆成功後才建立本地檔案
        let mut file = tokio::fs::File::create(local).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    fn status(&self) -> &dyn StatusArea {
        &self.status
    }
}

/// Decodes a GET result into the typed payload expected from `path`.
pub fn decode<T: DeserializeOwned>(path: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| HubError::ResponseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}
