//! Terminal views of device payloads.

use crate::domain::form::{FieldKind, SettingsForm};
use crate::domain::model::{DeviceInfo, DeviceKind, FileList, FreeSpace, Measurements, Params};
use std::fmt;

pub struct SettingsView<'a> {
    pub title: Option<&'a str>,
    pub form: &'a SettingsForm,
}

impl<'a> SettingsView<'a> {
    pub fn new(form: &'a SettingsForm) -> Self {
        Self { title: None, form }
    }

    pub fn titled(title: &'a str, form: &'a SettingsForm) -> Self {
        Self {
            title: Some(title),
            form,
        }
    }
}

impl fmt::Display for SettingsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "== {} ==", title)?;
        }

        if self.form.is_empty() {
            return writeln!(f, "No configurable options");
        }

        let width = self
            .form
            .fields()
            .iter()
            .map(|field| field.label.len())
            .max()
            .unwrap_or(0);

        for field in self.form.fields() {
            match &field.kind {
                FieldKind::Select { options, current } => {
                    let choices: Vec<String> = options
                        .iter()
                        .map(|o| if o == current { format!("[{}]", o) } else { o.clone() })
                        .collect();
                    writeln!(f, "{:<width$}  select    {}", field.label, choices.join(" | "))?;
                }
                FieldKind::Number(_) => {
                    let step = field.step().unwrap_or(1.0);
                    writeln!(
                        f,
                        "{:<width$}  number    {} (step {})",
                        field.label,
                        field.display_value(),
                        step
                    )?;
                }
                _ => {
                    writeln!(
                        f,
                        "{:<width$}  {:<8}  {}",
                        field.label,
                        field.input_type(),
                        field.display_value()
                    )?;
                }
            }
        }
        Ok(())
    }
}

pub struct DeviceMenu<'a> {
    pub kind: DeviceKind,
    pub devices: &'a [DeviceInfo],
}

impl fmt::Display for DeviceMenu<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.devices.is_empty() {
            return match self.kind {
                DeviceKind::Sensor => writeln!(f, "No active sensors"),
                DeviceKind::Receiver => writeln!(f, "No active receivers"),
            };
        }

        for device in self.devices {
            writeln!(
                f,
                "[{}] {}{}",
                device.position_id,
                device.description.name,
                device
                    .description
                    .kind
                    .as_deref()
                    .map(|k| format!(" ({})", k))
                    .unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

pub struct FileTable<'a>(pub &'a FileList);

impl FileTable<'_> {
    pub fn download_link(file: &str) -> String {
        Params::new().with("path", file).append_to("/download")
    }
}

impl fmt::Display for FileTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.files.is_empty() {
            return writeln!(f, "No files");
        }
        for file in &self.0.files {
            writeln!(f, "{}\t{}", file, Self::download_link(file))?;
        }
        Ok(())
    }
}

pub struct FreeSpaceLine(pub FreeSpace);

impl fmt::Display for FreeSpaceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Free space: {} bytes", self.0.space)
    }
}

pub struct MeasurementTable<'a>(pub &'a Measurements);

impl fmt::Display for MeasurementTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.measurements.is_empty() {
            return writeln!(f, "No measurements");
        }
        for m in &self.0.measurements {
            match m.value {
                Some(value) => writeln!(f, "{}: {} {}", m.parameter, value, m.unit)?,
                None => writeln!(f, "{}: n/a", m.parameter)?,
            }
        }
        Ok(())
    }
}
