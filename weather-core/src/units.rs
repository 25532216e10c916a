use serde::{Deserialize, Serialize};
use std::fmt;

const KELVIN_OFFSET: f32 = 273.15;

/// Unit the user wants temperatures displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Maps the on/off state of a "°F" toggle onto a unit.
    pub fn from_fahrenheit(is_fahrenheit: bool) -> Self {
        if is_fahrenheit { Self::Fahrenheit } else { Self::Celsius }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    round2(kelvin - KELVIN_OFFSET)
}

pub fn kelvin_to_fahrenheit(kelvin: f32) -> f32 {
    round2((kelvin - KELVIN_OFFSET) * (9.0 / 5.0) + 32.0)
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    round2(celsius * (9.0 / 5.0) + 32.0)
}

pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    round2((fahrenheit - 32.0) * (5.0 / 9.0))
}

/// A temperature ready to be shown, already converted and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTemperature {
    pub value: f32,
    pub unit: TemperatureUnit,
}

impl DisplayTemperature {
    pub fn from_kelvin(kelvin: f32, unit: TemperatureUnit) -> Self {
        let value = match unit {
            TemperatureUnit::Celsius => kelvin_to_celsius(kelvin),
            TemperatureUnit::Fahrenheit => kelvin_to_fahrenheit(kelvin),
        };

        Self { value, unit }
    }
}

impl fmt::Display for DisplayTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn kelvin_conversions_round_to_two_decimals() {
        assert_eq!(kelvin_to_celsius(300.0), 26.85);
        assert_eq!(kelvin_to_fahrenheit(300.0), 80.33);
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        assert_eq!(kelvin_to_fahrenheit(273.15), 32.0);
    }

    #[test]
    fn kelvin_conversions_match_formula_over_a_range() {
        let mut k = 0.0_f32;
        while k < 400.0 {
            assert_close(kelvin_to_celsius(k), k - 273.15, 0.0051);
            assert_close(kelvin_to_fahrenheit(k), (k - 273.15) * 9.0 / 5.0 + 32.0, 0.0051);
            k += 7.31;
        }
    }

    #[test]
    fn negative_kelvin_is_not_rejected() {
        assert_eq!(kelvin_to_celsius(-10.0), -283.15);
    }

    #[test]
    fn celsius_fahrenheit_fixed_points() {
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(fahrenheit_to_celsius(98.6), 37.0);
    }

    #[test]
    fn fahrenheit_survives_a_trip_through_celsius() {
        let mut raw = -60.0_f32;
        while raw < 130.0 {
            let f = round2(raw);
            let back = celsius_to_fahrenheit(fahrenheit_to_celsius(f));
            assert_close(back, f, 0.0101);
            raw += 0.37;
        }
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-2.5), -2.5);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn display_temperature_formats_with_symbol() {
        let c = DisplayTemperature::from_kelvin(300.0, TemperatureUnit::Celsius);
        let f = DisplayTemperature::from_kelvin(300.0, TemperatureUnit::Fahrenheit);

        assert_eq!(c.to_string(), "26.85°C");
        assert_eq!(f.to_string(), "80.33°F");
    }

    #[test]
    fn unit_parsing_and_toggle() {
        assert_eq!(TemperatureUnit::try_from("F").unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::try_from("celsius").unwrap(), TemperatureUnit::Celsius);
        assert!(TemperatureUnit::try_from("kelvin").is_err());

        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_fahrenheit(false), TemperatureUnit::Celsius);
    }
}
