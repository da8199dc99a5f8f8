use crate::error::{ChargewiseError, Result};
use serde_json::{Map, Value};

/// Car connection state reported in the `car` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarState {
    /// Reported as 0 by the charger
    UnknownError,
    Idle,
    Charging,
    WaitingForCar,
    Complete,
    Error,
    /// Absent or outside the documented range
    #[default]
    Unknown,
}

impl CarState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::UnknownError,
            Some(1) => Self::Idle,
            Some(2) => Self::Charging,
            Some(3) => Self::WaitingForCar,
            Some(4) => Self::Complete,
            Some(5) => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown/Error",
            Self::Idle => "Idle",
            Self::Charging => "Charging",
            Self::WaitingForCar => "Wait for car",
            Self::Complete => "Complete",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CarState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Point-in-time charger status; every field may be missing independently
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChargerStatus {
    /// Raw `car` code, kept for display next to the decoded state
    pub car_code: Option<i64>,
    pub car_state: CarState,
    /// Actual charging current (`acu`)
    pub current_ampere: Option<i64>,
    /// Configured current limit (`amp`)
    pub current_limit_ampere: Option<i64>,
    /// Charging allowed (`alw`)
    pub allow_charging: Option<bool>,
    /// Configured energy limit in Wh (`dwo`)
    pub energy_limit_wh: Option<f64>,
}

impl ChargerStatus {
    /// Decode a status object; malformed fields become `None`
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let car_code = field_content(obj, "car").and_then(|s| s.parse::<i64>().ok());
        Self {
            car_code,
            car_state: CarState::from_code(car_code),
            current_ampere: field_content(obj, "acu").and_then(|s| s.parse().ok()),
            current_limit_ampere: field_content(obj, "amp").and_then(|s| s.parse().ok()),
            allow_charging: field_content(obj, "alw").and_then(|s| parse_strict_bool(&s)),
            energy_limit_wh: field_content(obj, "dwo").and_then(|s| parse_finite_f64(&s)),
        }
    }

    /// Decode a raw response body; only a non-object body is an error
    pub fn from_json_str(body: &str) -> Result<Self> {
        Ok(Self::from_object(&parse_object(body)?))
    }
}

/// Parse a response body that must be a JSON object
pub(crate) fn parse_object(body: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ChargewiseError::unexpected(format!("Invalid JSON response: {}", e)))?;
    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(ChargewiseError::unexpected(format!(
            "Expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Textual content of a primitive field; null, arrays and objects count as absent
pub(crate) fn field_content(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_strict_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_finite_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
