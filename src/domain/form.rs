//! Editable view of a device configuration object.
//!
//! The hub publishes its settings (global and per-peripheral) as a flat JSON
//! object. Each member becomes a typed field; edits are parsed against that
//! type and the whole form is collected back into the JSON the firmware
//! accepts on `POST`.

use crate::utils::error::{HubError, Result};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(String),
    Number(Number),
    Checkbox(bool),
    Select { options: Vec<String>, current: String },
    /// Arrays, null and objects without `options`; sent back unchanged.
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key as published by the device.
    pub label: String,
    /// Key used when the form is collected: the label with its first space
    /// replaced by `_`.
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(label: &str, value: &Value) -> Self {
        let kind = match value {
            Value::Bool(b) => FieldKind::Checkbox(*b),
            Value::Number(n) => FieldKind::Number(n.clone()),
            Value::String(s) => FieldKind::Text(s.clone()),
            Value::Object(obj) => match obj.get("options").and_then(Value::as_array) {
                Some(options) => FieldKind::Select {
                    options: options.iter().map(display_value).collect(),
                    current: obj.get("current").map(display_value).unwrap_or_default(),
                },
                None => FieldKind::Raw(value.clone()),
            },
            other => FieldKind::Raw(other.clone()),
        };

        Self {
            label: label.to_string(),
            name: label.replacen(' ', "_", 1),
            kind,
        }
    }

    /// Input granularity for number fields: 1 for whole numbers, 0.01 otherwise.
    pub fn step(&self) -> Option<f64> {
        match &self.kind {
            FieldKind::Number(n) => Some(if is_whole(n) { 1.0 } else { 0.01 }),
            _ => None,
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Text(_) | FieldKind::Raw(_) => "text",
            FieldKind::Number(_) => "number",
            FieldKind::Checkbox(_) => "checkbox",
            FieldKind::Select { .. } => "select",
        }
    }

    pub fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Text(s) => s.clone(),
            FieldKind::Number(n) => n.to_string(),
            FieldKind::Checkbox(b) => b.to_string(),
            FieldKind::Select { current, .. } => current.clone(),
            FieldKind::Raw(v) => v.to_string(),
        }
    }

    /// Parses `raw` according to the field's type and stores it.
    pub fn set(&mut self, raw: &str) -> Result<()> {
        let invalid = |reason: String| HubError::FormError {
            field: self.label.clone(),
            reason,
        };

        let kind = match &self.kind {
            FieldKind::Text(_) => FieldKind::Text(raw.to_string()),
            FieldKind::Number(_) => FieldKind::Number(
                parse_number(raw).ok_or_else(|| invalid(format!("'{}' is not a number", raw)))?,
            ),
            FieldKind::Checkbox(_) => FieldKind::Checkbox(
                parse_flag(raw).ok_or_else(|| invalid(format!("'{}' is not true or false", raw)))?,
            ),
            FieldKind::Select { options, .. } => {
                if !options.iter().any(|o| o == raw) {
                    return Err(invalid(format!(
                        "'{}' is not one of: {}",
                        raw,
                        options.join(", ")
                    )));
                }
                FieldKind::Select {
                    options: options.clone(),
                    current: raw.to_string(),
                }
            }
            FieldKind::Raw(_) => FieldKind::Raw(
                serde_json::from_str(raw).map_err(|e| invalid(format!("invalid JSON: {}", e)))?,
            ),
        };

        self.kind = kind;
        Ok(())
    }

    fn collect(&self) -> Value {
        match &self.kind {
            FieldKind::Text(s) => Value::String(s.clone()),
            FieldKind::Number(n) => Value::Number(n.clone()),
            FieldKind::Checkbox(b) => Value::Bool(*b),
            FieldKind::Select { current, .. } => {
                let mut obj = Map::new();
                obj.insert("current".to_string(), Value::String(current.clone()));
                Value::Object(obj)
            }
            FieldKind::Raw(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    fields: Vec<Field>,
}

impl SettingsForm {
    /// Builds a form from a configuration object, keeping the device's key order.
    pub fn from_json(config: &Value) -> Result<Self> {
        let obj = config.as_object().ok_or_else(|| HubError::FormError {
            field: "config".to_string(),
            reason: format!("expected a JSON object, got {}", config),
        })?;

        Ok(Self {
            fields: obj.iter().map(|(k, v)| Field::new(k, v)).collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by collected name first, then by label.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == key)
            .or_else(|| self.fields.iter().find(|f| f.label == key))
    }

    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == key)
            .or_else(|| self.fields.iter().position(|f| f.label == key))
            .ok_or_else(|| HubError::FormError {
                field: key.to_string(),
                reason: "no such setting".to_string(),
            })?;
        self.fields[index].set(raw)
    }

    /// Applies `key=value` assignments in order.
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<()> {
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, raw) = assignment
                .split_once('=')
                .ok_or_else(|| HubError::FormError {
                    field: assignment.to_string(),
                    reason: "expected KEY=VALUE".to_string(),
                })?;
            self.set(key.trim(), raw)?;
        }
        Ok(())
    }

    /// Collects every field back into the object posted to the device.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for field in &self.fields {
            obj.insert(field.name.clone(), field.collect());
        }
        Value::Object(obj)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_whole(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
