//! One module per screen of the hub's web interface. Each page drives the
//! device through a [`DeviceApi`](crate::domain::ports::DeviceApi) and hands
//! back typed data for the caller to render.

pub mod config;
pub mod devices;
pub mod index;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ConfigPage;
pub use devices::DevicesPage;
pub use index::IndexPage;
pub use storage::{StoragePage, StorageSnapshot};
