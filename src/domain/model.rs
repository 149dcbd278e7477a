use crate::utils::error::{HubError, Result};
use serde::{Deserialize, Serialize};

/// Ordered key/value parameters for a single request.
///
/// Sent as form fields for POST/PUT and as a query string for GET. Insertion
/// order is kept so requests go out exactly as they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `application/x-www-form-urlencoded` rendering, without the leading `?`.
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Appends the query string to `path`, leaving it untouched when empty.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query())
        }
    }
}

/// The two kinds of configurable peripherals on the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Sensor,
    Receiver,
}

impl DeviceKind {
    pub fn config_path(&self) -> &'static str {
        match self {
            DeviceKind::Sensor => "/sensors/config",
            DeviceKind::Receiver => "/signals/config",
        }
    }

    /// Name of the request parameter carrying the position ID.
    pub fn param_name(&self) -> &'static str {
        match self {
            DeviceKind::Sensor => "sensor",
            DeviceKind::Receiver => "receiver",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.param_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescription {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "parameterQuantity", default)]
    pub parameter_quantity: Option<u32>,
    #[serde(rename = "signalQuantity", default)]
    pub signal_quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "positionID")]
    pub position_id: u32,
    pub description: DeviceDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorList {
    #[serde(default)]
    pub sensors: Vec<DeviceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverList {
    #[serde(default)]
    pub receivers: Vec<DeviceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub parameter: String,
    /// `null` when the sensor produced no reading (NaN on the device).
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpace {
    pub space: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    pub version: String,
}

/// Clock payload for `/setTime`: unix seconds plus the local offset east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSetting {
    pub time: i64,
    pub offset: i32,
}

impl TimeSetting {
    pub fn from_datetime<Tz: chrono::TimeZone>(now: &chrono::DateTime<Tz>) -> Self {
        use chrono::Offset;
        Self {
            time: now.timestamp(),
            offset: now.offset().fix().local_minus_utc(),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(&chrono::Local::now())
    }
}

/// Outcome of one calibration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    Error,
    Done,
    /// The sensor expects the next step to be requested.
    Next,
}

impl CalibrationStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CalibrationStatus::Error),
            1 => Some(CalibrationStatus::Done),
            2 => Some(CalibrationStatus::Next),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CalibrationStatus::Error => "error",
            CalibrationStatus::Done => "done",
            CalibrationStatus::Next => "next step required",
        })
    }
}

/// Reply of `/sensors/calibrate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationResult {
    pub status: CalibrationStatus,
    pub message: String,
}

impl CalibrationResult {
    /// Parses `{"response": <code>, "message": <text>}`.
    ///
    /// The firmware splices the message in without quoting it, so the body is
    /// matched field by field instead of being decoded as JSON.
    pub fn parse(body: &str) -> Result<Self> {
        use regex::Regex;

        let invalid = |message: String| HubError::ResponseError {
            path: "/sensors/calibrate".to_string(),
            message,
        };
        let re = Regex::new(r#"(?s)^\s*\{\s*"response"\s*:\s*(-?\d+)\s*,\s*"message"\s*:\s*(.*?)\s*\}\s*$"#)
            .map_err(|e| invalid(e.to_string()))?;
        let caps = re
            .captures(body)
            .ok_or_else(|| invalid(format!("unrecognised reply '{}'", body)))?;

        let code: i64 = caps[1]
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
        let status = CalibrationStatus::from_code(code)
            .ok_or_else(|| invalid(format!("unknown calibration response {}", code)))?;

        let raw = &caps[2];
        let message = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(text)) => text,
            _ => raw.to_string(),
        };
        Ok(Self { status, message })
    }
}

/// How a signal is addressed on a receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalRef {
    Id(i64),
    Name(String),
}
