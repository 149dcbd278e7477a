pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ConsoleConfig;

#[cfg(feature = "cli")]
pub use crate::core::console::Console;
pub use crate::core::request::HttpDeviceClient;
pub use crate::core::status::{ConsoleStatus, MemoryStatus};
pub use crate::utils::error::{HubError, Result};
