use std::num::IntErrorKind;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

// Key selecting the light mode.
const MODE: &str = "mode";

// Color channels.
const RED: Field = Field::new("red", 0);
const GREEN: Field = Field::new("green", 0);
const BLUE: Field = Field::new("blue", 0);
const WHITE: Field = Field::new("white", 0);

// Effect interval.
const INTERVAL: Field = Field::new("interval", 50);

// Overall brightness.
const BRIGHTNESS: Field = Field::new("brightness", 255);

// A light operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Off,
    Color,
    Rainbow,
    Flash,
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "color" => Ok(Self::Color),
            "rainbow" => Ok(Self::Rainbow),
            "flash" => Ok(Self::Flash),
            other => Err(ValidationError::UnknownMode(other.into())),
        }
    }
}

// A numeric state field together with the value used when it is missing.
#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    default: u8,
}

impl Field {
    const fn new(name: &'static str, default: u8) -> Self {
        Self { name, default }
    }

    // Resolves the field value from an input document.
    fn resolve(&self, input: &Map<String, Value>) -> Result<u8, ValidationError> {
        let Some(value) = input.get(self.name) else {
            return Ok(self.default);
        };

        let value = self.coerce(value)?;
        u8::try_from(value).map_err(|_| ValidationError::OutOfRange {
            field: self.name,
            value,
        })
    }

    // Turns a JSON value into an integer.
    //
    // Integers and integral floats are taken as they are, strings are parsed
    // as base-10 integers. Every other kind, booleans included, is rejected.
    fn coerce(&self, value: &Value) -> Result<i64, ValidationError> {
        let bad_type = || ValidationError::BadFieldType { field: self.name };
        let out_of_range = |value| ValidationError::OutOfRange {
            field: self.name,
            value,
        };

        match value {
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Ok(value)
                } else if number.is_u64() {
                    // Reported saturated.
                    Err(out_of_range(i64::MAX))
                } else {
                    let value = number.as_f64().ok_or_else(bad_type)?;
                    if value.fract() != 0.0 || !value.is_finite() {
                        return Err(bad_type());
                    }
                    // Saturates outside the i64 range, which is out of range anyway.
                    Ok(value as i64)
                }
            }
            Value::String(text) => text.trim().parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow => out_of_range(i64::MAX),
                IntErrorKind::NegOverflow => out_of_range(i64::MIN),
                _ => bad_type(),
            }),
            _ => Err(bad_type()),
        }
    }
}

// Color mode fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
    pub(crate) white: u8,
    pub(crate) brightness: u8,
}

impl Color {
    fn resolve(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            red: RED.resolve(input)?,
            green: GREEN.resolve(input)?,
            blue: BLUE.resolve(input)?,
            white: WHITE.resolve(input)?,
            brightness: BRIGHTNESS.resolve(input)?,
        })
    }
}

// Rainbow mode fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Rainbow {
    pub(crate) interval: u8,
    pub(crate) brightness: u8,
}

impl Rainbow {
    fn resolve(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            interval: INTERVAL.resolve(input)?,
            brightness: BRIGHTNESS.resolve(input)?,
        })
    }
}

// Flash mode fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Flash {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
    pub(crate) white: u8,
    pub(crate) interval: u8,
    pub(crate) brightness: u8,
}

impl Flash {
    fn resolve(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            red: RED.resolve(input)?,
            green: GREEN.resolve(input)?,
            blue: BLUE.resolve(input)?,
            white: WHITE.resolve(input)?,
            interval: INTERVAL.resolve(input)?,
            brightness: BRIGHTNESS.resolve(input)?,
        })
    }
}

/// Light state.
///
/// Each variant carries exactly the fields of its mode and serializes as a
/// flat object tagged by `mode`, e.g. `{"mode":"rainbow","interval":50,"brightness":255}`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub(crate) enum LightState {
    // Light is off.
    #[default]
    Off,
    // Fixed color.
    Color(Color),
    // Rainbow cycle.
    Rainbow(Rainbow),
    // Flashing color.
    Flash(Flash),
}

impl LightState {
    /// Validates a raw input document, producing a complete light state.
    ///
    /// Missing fields take their mode default, unknown fields are ignored.
    pub(crate) fn validate(input: &Value) -> Result<Self, ValidationError> {
        let input = input.as_object().ok_or(ValidationError::MissingMode)?;

        let mode = match input.get(MODE) {
            Some(Value::String(tag)) => tag.parse::<Mode>()?,
            Some(other) => return Err(ValidationError::UnknownMode(other.to_string())),
            None => return Err(ValidationError::MissingMode),
        };

        Ok(match mode {
            Mode::Off => Self::Off,
            Mode::Color => Self::Color(Color::resolve(input)?),
            Mode::Rainbow => Self::Rainbow(Rainbow::resolve(input)?),
            Mode::Flash => Self::Flash(Flash::resolve(input)?),
        })
    }

    pub(crate) fn mode(&self) -> Mode {
        match self {
            Self::Off => Mode::Off,
            Self::Color(_) => Mode::Color,
            Self::Rainbow(_) => Mode::Rainbow,
            Self::Flash(_) => Mode::Flash,
        }
    }
}
