//! Environmental readings collected from the host page

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four inputs the classifier is trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingField {
    Temperature,
    Humidity,
    LightIntensity,
    Co2Level,
}

impl ReadingField {
    pub const ALL: [ReadingField; 4] = [
        ReadingField::Temperature,
        ReadingField::Humidity,
        ReadingField::LightIntensity,
        ReadingField::Co2Level,
    ];

    /// Wire name used in request bodies
    pub fn key(&self) -> &'static str {
        match self {
            ReadingField::Temperature => "temperature",
            ReadingField::Humidity => "humidity",
            ReadingField::LightIntensity => "light_intensity",
            ReadingField::Co2Level => "co2_level",
        }
    }

    /// Human-readable label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            ReadingField::Temperature => "temperature",
            ReadingField::Humidity => "humidity",
            ReadingField::LightIntensity => "light intensity",
            ReadingField::Co2Level => "CO2 level",
        }
    }
}

impl fmt::Display for ReadingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    #[error("{field} is required")]
    Missing { field: ReadingField },
    #[error("{field} must be a number (got \"{raw}\")")]
    NotANumber { field: ReadingField, raw: String },
    #[error("{field} must be finite (got \"{raw}\")")]
    NotFinite { field: ReadingField, raw: String },
}

impl ReadingError {
    pub fn field(&self) -> ReadingField {
        match self {
            ReadingError::Missing { field }
            | ReadingError::NotANumber { field, .. }
            | ReadingError::NotFinite { field, .. } => *field,
        }
    }
}

/// A validated set of environmental measurements.
///
/// Serializes to the request body shape the classification endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub temperature: f64,
    pub humidity: f64,
    pub light_intensity: f64,
    pub co2_level: f64,
}

impl EnvironmentalReading {
    pub fn new(temperature: f64, humidity: f64, light_intensity: f64, co2_level: f64) -> Self {
        Self {
            temperature,
            humidity,
            light_intensity,
            co2_level,
        }
    }

    pub fn get(&self, field: ReadingField) -> f64 {
        match field {
            ReadingField::Temperature => self.temperature,
            ReadingField::Humidity => self.humidity,
            ReadingField::LightIntensity => self.light_intensity,
            ReadingField::Co2Level => self.co2_level,
        }
    }
}

/// Unparsed text as typed into the page inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReading {
    pub temperature: String,
    pub humidity: String,
    pub light_intensity: String,
    pub co2_level: String,
}

impl RawReading {
    pub fn new(
        temperature: impl Into<String>,
        humidity: impl Into<String>,
        light_intensity: impl Into<String>,
        co2_level: impl Into<String>,
    ) -> Self {
        Self {
            temperature: temperature.into(),
            humidity: humidity.into(),
            light_intensity: light_intensity.into(),
            co2_level: co2_level.into(),
        }
    }

    pub fn get(&self, field: ReadingField) -> &str {
        match field {
            ReadingField::Temperature => &self.temperature,
            ReadingField::Humidity => &self.humidity,
            ReadingField::LightIntensity => &self.light_intensity,
            ReadingField::Co2Level => &self.co2_level,
        }
    }

    /// Validate every field, reporting the first one that fails in page order
    pub fn parse(&self) -> Result<EnvironmentalReading, ReadingError> {
        Ok(EnvironmentalReading {
            temperature: parse_field(ReadingField::Temperature, &self.temperature)?,
            humidity: parse_field(ReadingField::Humidity, &self.humidity)?,
            light_intensity: parse_field(ReadingField::LightIntensity, &self.light_intensity)?,
            co2_level: parse_field(ReadingField::Co2Level, &self.co2_level)?,
        })
    }
}

fn parse_field(field: ReadingField, raw: &str) -> Result<f64, ReadingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReadingError::Missing { field });
    }

    let value: f64 = trimmed.parse().map_err(|_| ReadingError::NotANumber {
        field,
        raw: raw.to_string(),
    })?;

    // "NaN" and "inf" parse successfully but would be rejected by the service
    if !value.is_finite() {
        return Err(ReadingError::NotFinite {
            field,
            raw: raw.to_string(),
        });
    }

    Ok(value)
}
