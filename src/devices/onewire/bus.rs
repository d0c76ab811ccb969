use super::common::DeviceAddress;
use anyhow::Error;
use std::{fmt, time::Duration};

// Celsius reading returned by ds18x20 compatible drivers when the slave
// did not respond. Reachable even on a transaction reported as
// successful, so readers must filter it explicitly.
pub const DEVICE_DISCONNECTED_C: f64 = -127.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
    Bits9,
    Bits10,
    Bits11,
    Bits12,
}
impl Resolution {
    // worst case conversion time at this resolution (datasheet t_conv)
    pub fn conversion_time(&self) -> Duration {
        match self {
            Resolution::Bits9 => Duration::from_micros(93_750),
            Resolution::Bits10 => Duration::from_micros(187_500),
            Resolution::Bits11 => Duration::from_micros(375_000),
            Resolution::Bits12 => Duration::from_micros(750_000),
        }
    }

    pub fn configuration_register(&self) -> u8 {
        match self {
            Resolution::Bits9 => 0x1f,
            Resolution::Bits10 => 0x3f,
            Resolution::Bits11 => 0x5f,
            Resolution::Bits12 => 0x7f,
        }
    }
}

// Raw on-chip register block, bytes 0..2 carrying the latest conversion
// result as a little-endian signed 1/16 degree fixed-point value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Scratchpad([u8; Self::LENGTH]);
impl Scratchpad {
    pub const LENGTH: usize = 9;

    pub fn new(scratchpad: [u8; Self::LENGTH]) -> Self {
        Self(scratchpad)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn temperature_celsius(&self) -> f64 {
        let raw = i16::from_le_bytes([self.0[0], self.0[1]]);
        raw as f64 / 16.0
    }
}

// Bus driver capability. Calls issue the electrical transaction and
// return without waiting for hardware conversion latency.
pub trait Bus: Send + Sync + fmt::Debug {
    fn enumerate(&self) -> Result<Vec<DeviceAddress>, Error>;
    fn configure(
        &self,
        address: DeviceAddress,
        resolution: Resolution,
        alarms_disabled: bool,
    ) -> Result<(), Error>;
    fn start_conversion(
        &self,
        address: DeviceAddress,
    ) -> Result<(), Error>;
    fn read_scratchpad(
        &self,
        address: DeviceAddress,
    ) -> Result<Scratchpad, Error>;
}

#[cfg(test)]
mod tests_scratchpad {
    use super::*;

    fn scratchpad_with_raw(raw: i16) -> Scratchpad {
        let raw = raw.to_le_bytes();
        Scratchpad::new([raw[0], raw[1], 0x00, 0x00, 0x7f, 0xff, 0x00, 0x10, 0x00])
    }

    #[test]
    fn zero() {
        let scratchpad = scratchpad_with_raw(0);
        assert_eq!(scratchpad.temperature_celsius(), 0.0);
        assert_eq!(scratchpad.as_bytes()[4], 0x7f);
    }
    #[test]
    fn positive() {
        // +25.0625*C, datasheet example
        assert_eq!(scratchpad_with_raw(0x0191).temperature_celsius(), 25.0625);
    }
    #[test]
    fn negative() {
        // -10.125*C, datasheet example
        assert_eq!(scratchpad_with_raw(-162).temperature_celsius(), -10.125);
    }
    #[test]
    fn power_on_reset() {
        assert_eq!(scratchpad_with_raw(85 * 16).temperature_celsius(), 85.0);
    }
    #[test]
    fn disconnected_sentinel() {
        // -127*C is exactly representable in the 1/16 fixed-point raw
        // format, the equality filter in readers is therefore well defined
        assert_eq!(
            scratchpad_with_raw(-127 * 16).temperature_celsius(),
            DEVICE_DISCONNECTED_C
        );
    }
}
