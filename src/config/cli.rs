use crate::core::DeviceKind;
use crate::domain::model::SignalRef;
use crate::utils::error::{HubError, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Reboot the hub
    Reboot,
    /// Forget the stored WiFi credentials and reboot
    Reset,
    /// Set the hub clock from this machine's clock
    SetTime,
    /// Show the firmware version
    Version,
    /// Global hub settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// List attached sensors and signal receivers
    Devices,
    /// Settings of a single sensor or receiver
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Show the latest sensor readings
    Measure {
        /// Take a fresh measurement first
        #[arg(long)]
        update: bool,
    },
    /// Run a signal on a receiver immediately
    Signal {
        /// Receiver position ID
        receiver: u32,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        payload: Option<String>,
    },
    /// Add a signal to a receiver's queue
    Queue {
        /// Receiver position ID
        receiver: u32,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        payload: Option<String>,
    },
    /// Run one calibration step on a sensor
    Calibrate {
        /// Sensor position ID
        sensor: u32,
        #[arg(long, default_value_t = 0)]
        step: i32,
    },
    /// Files on the hub's storage
    #[command(subcommand)]
    Storage(StorageCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    Show,
    /// Change settings, e.g. `config set period=60 tasksEnabled=true`
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DeviceCommand {
    Show(DeviceTarget),
    Set {
        #[command(flatten)]
        target: DeviceTarget,
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DeviceTarget {
    /// Sensor position ID
    #[arg(long, conflicts_with = "receiver", required_unless_present = "receiver")]
    pub sensor: Option<u32>,
    /// Receiver position ID
    #[arg(long)]
    pub receiver: Option<u32>,
}

impl DeviceTarget {
    pub fn resolve(&self) -> Result<(DeviceKind, u32)> {
        match (self.sensor, self.receiver) {
            (Some(id), None) => Ok((DeviceKind::Sensor, id)),
            (None, Some(id)) => Ok((DeviceKind::Receiver, id)),
            _ => Err(HubError::FormError {
                field: "device".to_string(),
                reason: "pass exactly one of --sensor or --receiver".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum StorageCommand {
    /// Free space on the device
    Space,
    /// List files
    Ls {
        path: Option<String>,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Delete a file
    Rm { path: String },
    /// Upload a local file
    Put {
        file: PathBuf,
        /// Destination directory on the device
        #[arg(long)]
        dest: Option<String>,
    },
    /// Download a file
    Get {
        path: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn signal_ref(id: Option<i64>, name: Option<String>) -> Result<SignalRef> {
    match (id, name) {
        (Some(id), None) => Ok(SignalRef::Id(id)),
        (None, Some(name)) => Ok(SignalRef::Name(name)),
        _ => Err(HubError::FormError {
            field: "signal".to_string(),
            reason: "pass exactly one of --id or --name".to_string(),
        }),
    }
}
