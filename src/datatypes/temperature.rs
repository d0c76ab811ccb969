use serde::{Deserialize, Serialize};
use std::fmt;

pub enum Unit {
    Kelvin,
    Celsius,
}

// Stored canonically in Kelvin, the unit expected by downstream consumers.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Debug)]
#[serde(transparent)]
pub struct Temperature {
    kelvin: f64,
}
impl Temperature {
    pub fn new(
        unit: Unit,
        value: f64,
    ) -> Self {
        let kelvin = match unit {
            Unit::Kelvin => value,
            Unit::Celsius => value + 273.15,
        };
        Self { kelvin }
    }

    pub fn to_unit(
        self,
        unit: Unit,
    ) -> f64 {
        match unit {
            Unit::Kelvin => self.kelvin,
            Unit::Celsius => self.kelvin - 273.15,
        }
    }
}
impl fmt::Display for Temperature {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{:.2}*K / {:.2}*C",
            self.to_unit(Unit::Kelvin),
            self.to_unit(Unit::Celsius),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn celsius_to_kelvin() {
        let temperature = Temperature::new(Unit::Celsius, 0.0);
        assert_relative_eq!(temperature.to_unit(Unit::Kelvin), 273.15);
    }

    #[test]
    fn kelvin_round_trip() {
        let temperature = Temperature::new(Unit::Kelvin, 293.15);
        assert_relative_eq!(temperature.to_unit(Unit::Celsius), 20.0);
    }
}
