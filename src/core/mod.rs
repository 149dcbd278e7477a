#[cfg(feature = "cli")]
pub mod console;
pub mod render;
pub mod request;
pub mod status;

pub use crate::domain::model::{DeviceKind, Params};
pub use crate::domain::ports::{DeviceApi, FileUpload, Reply, StatusArea};
pub use crate::utils::error::Result;
