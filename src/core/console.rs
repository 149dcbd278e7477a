use crate::app::pages::{ConfigPage, DevicesPage, IndexPage, StoragePage};
use crate::config::cli::{signal_ref, Command, ConfigCommand, DeviceCommand, StorageCommand};
use crate::config::ConsoleConfig;
use crate::core::render::{DeviceMenu, FileTable, FreeSpaceLine, MeasurementTable, SettingsView};
use crate::core::{DeviceApi, DeviceKind};
use crate::domain::model::TimeSetting;
use crate::utils::error::Result;
use crate::utils::validation::validate_device_path;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub type Confirm = fn(&str) -> bool;

/// Asks a yes/no question on the terminal; anything but y/yes declines.
pub fn prompt_stdin(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Runs one console command against the hub and renders the result.
pub struct Console<'a, A: DeviceApi + ?Sized> {
    api: &'a A,
    settings: ConsoleConfig,
    assume_yes: bool,
    confirm: Confirm,
}

impl<'a, A: DeviceApi + ?Sized> Console<'a, A> {
    pub fn new(api: &'a A, settings: ConsoleConfig) -> Self {
        Self {
            api,
            settings,
            assume_yes: false,
            confirm: prompt_stdin,
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with_confirm(mut self, confirm: Confirm) -> Self {
        self.confirm = confirm;
        self
    }

    fn confirmed(&self, question: &str) -> bool {
        self.assume_yes || (self.confirm)(question)
    }

    /// Executes `command`; the returned text is everything to print besides
    /// status-area messages.
    pub async fn run(&self, command: &Command) -> Result<String> {
        tracing::debug!("Running {:?}", command);

        match command {
            Command::Reboot => {
                IndexPage::new(self.api).reboot().await?;
                Ok(String::new())
            }
            Command::Reset => {
                if !self.confirmed("Reset WiFi settings?") {
                    return Ok("Cancelled\n".to_string());
                }
                IndexPage::new(self.api).reset().await?;
                Ok(String::new())
            }
            Command::SetTime => {
                IndexPage::new(self.api).set_time(TimeSetting::now()).await?;
                Ok(String::new())
            }
            Command::Version => {
                let version = IndexPage::new(self.api).version().await?;
                Ok(format!("Firmware version: {}\n", version.version))
            }
            Command::Config(cmd) => self.run_config(cmd).await,
            Command::Devices => {
                let page = DevicesPage::new(self.api);
                let sensors = page.list_sensors().await?;
                let receivers = page.list_receivers().await?;

                let mut out = String::from("Sensors:\n");
                out.push_str(
                    &DeviceMenu {
                        kind: DeviceKind::Sensor,
                        devices: &sensors,
                    }
                    .to_string(),
                );
                out.push_str("Receivers:\n");
                out.push_str(
                    &DeviceMenu {
                        kind: DeviceKind::Receiver,
                        devices: &receivers,
                    }
                    .to_string(),
                );
                Ok(out)
            }
            Command::Device(cmd) => self.run_device(cmd).await,
            Command::Measure { update } => {
                let data = DevicesPage::new(self.api).measurement(*update).await?;
                Ok(MeasurementTable(&data).to_string())
            }
            Command::Signal {
                receiver,
                id,
                name,
                payload,
            } => {
                let signal = signal_ref(*id, name.clone())?;
                let reply = DevicesPage::new(self.api)
                    .execute_signal(*receiver, &signal, payload.as_deref())
                    .await?;
                if reply.body.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("{}\n", reply.body))
                }
            }
            Command::Queue {
                receiver,
                id,
                name,
                payload,
            } => {
                let signal = signal_ref(*id, name.clone())?;
                DevicesPage::new(self.api)
                    .queue_signal(*receiver, &signal, payload.as_deref())
                    .await?;
                Ok(String::new())
            }
            Command::Calibrate { sensor, step } => {
                let result = DevicesPage::new(self.api).calibrate(*sensor, *step).await?;
                Ok(format!("Calibration {}\n", result.status))
            }
            Command::Storage(cmd) => self.run_storage(cmd).await,
        }
    }

    async fn run_config(&self, cmd: &ConfigCommand) -> Result<String> {
        let page = ConfigPage::new(self.api);
        let form = match cmd {
            ConfigCommand::Show => page.load_settings().await?,
            ConfigCommand::Set { assignments } => page.edit(assignments).await?,
        };
        Ok(SettingsView::new(&form).to_string())
    }

    async fn run_device(&self, cmd: &DeviceCommand) -> Result<String> {
        let page = DevicesPage::new(self.api);
        let (target, assignments) = match cmd {
            DeviceCommand::Show(target) => (target, None),
            DeviceCommand::Set {
                target,
                assignments,
            } => (target, Some(assignments)),
        };
        let (kind, position_id) = target.resolve()?;

        let title = page
            .list(kind)
            .await?
            .into_iter()
            .find(|d| d.position_id == position_id)
            .map(|d| d.description.name)
            .unwrap_or_else(|| format!("{} {}", kind, position_id));

        let form = match assignments {
            Some(assignments) => page.edit_device(kind, position_id, assignments).await?,
            None => page.load_device(kind, position_id).await?,
        };
        Ok(SettingsView::titled(&title, &form).to_string())
    }

    async fn run_storage(&self, cmd: &StorageCommand) -> Result<String> {
        let page = StoragePage::new(self.api);
        let storage = &self.settings.storage;

        match cmd {
            StorageCommand::Space => Ok(format!("{}\n", FreeSpaceLine(page.free_space().await?))),
            StorageCommand::Ls { path, depth } => {
                let path = path.as_deref().unwrap_or(&storage.list_root);
                validate_device_path("path", path)?;
                let files = page
                    .list_files(path, depth.unwrap_or(storage.list_depth))
                    .await?;
                Ok(FileTable(&files).to_string())
            }
            StorageCommand::Rm { path } => {
                validate_device_path("path", path)?;
                if !self.confirmed(&format!("Delete {}?", path)) {
                    return Ok("Cancelled\n".to_string());
                }
                let free = page.delete_file(path).await?;
                Ok(format!("{}\n", FreeSpaceLine(free)))
            }
            StorageCommand::Put { file, dest } => {
                let dest = dest.as_deref().unwrap_or(&storage.upload_destination);
                validate_device_path("dest", dest)?;
                let snapshot = page.upload(file, dest).await?;
                Ok(format!(
                    "{}{}\n",
                    FileTable(&snapshot.files),
                    FreeSpaceLine(snapshot.free)
                ))
            }
            StorageCommand::Get { path, output } => {
                validate_device_path("path", path)?;
                let local = output.clone().unwrap_or_else(|| default_download_target(path));
                let written = page.download(path, &local).await?;
                Ok(format!("Saved {} bytes to {}\n", written, local.display()))
            }
        }
    }
}

/// Downloads land in the working directory under the device file's name.
fn default_download_target(device_path: &str) -> PathBuf {
    Path::new(device_path)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("download.bin"))
}
