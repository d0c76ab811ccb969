// Scriptable in-memory bus for development and tests on machines
// without 1-wire hardware attached.

use super::{
    bus::{Bus, Resolution, Scratchpad},
    common::DeviceAddress,
};
use anyhow::{Error, bail, ensure};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
struct Inner {
    temperatures_celsius: HashMap<DeviceAddress, f64>,
    read_failing: HashSet<DeviceAddress>,

    configured: Vec<(DeviceAddress, Resolution, bool)>,
    conversions_started: HashMap<DeviceAddress, usize>,
    scratchpad_reads: HashMap<DeviceAddress, usize>,
}

#[derive(Debug)]
pub struct BusStub {
    devices: Vec<DeviceAddress>,
    inner: Mutex<Inner>,
}
impl BusStub {
    pub fn new(devices: Vec<DeviceAddress>) -> Self {
        let inner = Inner {
            temperatures_celsius: HashMap::new(),
            read_failing: HashSet::new(),

            configured: Vec::new(),
            conversions_started: HashMap::new(),
            scratchpad_reads: HashMap::new(),
        };
        let inner = Mutex::new(inner);

        Self { devices, inner }
    }

    pub fn temperature_celsius_set(
        &self,
        address: DeviceAddress,
        temperature_celsius: f64,
    ) {
        self.inner
            .lock()
            .temperatures_celsius
            .insert(address, temperature_celsius);
    }
    pub fn read_failing_set(
        &self,
        address: DeviceAddress,
        failing: bool,
    ) {
        let mut inner = self.inner.lock();
        if failing {
            inner.read_failing.insert(address);
        } else {
            inner.read_failing.remove(&address);
        }
    }

    pub fn configured(&self) -> Vec<(DeviceAddress, Resolution, bool)> {
        self.inner.lock().configured.clone()
    }
    pub fn conversions_started(
        &self,
        address: DeviceAddress,
    ) -> usize {
        self.inner
            .lock()
            .conversions_started
            .get(&address)
            .copied()
            .unwrap_or(0)
    }
    pub fn scratchpad_reads(
        &self,
        address: DeviceAddress,
    ) -> usize {
        self.inner
            .lock()
            .scratchpad_reads
            .get(&address)
            .copied()
            .unwrap_or(0)
    }
}
impl Bus for BusStub {
    fn enumerate(&self) -> Result<Vec<DeviceAddress>, Error> {
        Ok(self.devices.clone())
    }

    fn configure(
        &self,
        address: DeviceAddress,
        resolution: Resolution,
        alarms_disabled: bool,
    ) -> Result<(), Error> {
        ensure!(
            self.devices.contains(&address),
            "no presence pulse from {}",
            address
        );
        self.inner
            .lock()
            .configured
            .push((address, resolution, alarms_disabled));
        Ok(())
    }

    fn start_conversion(
        &self,
        address: DeviceAddress,
    ) -> Result<(), Error> {
        ensure!(
            self.devices.contains(&address),
            "no presence pulse from {}",
            address
        );
        *self
            .inner
            .lock()
            .conversions_started
            .entry(address)
            .or_insert(0) += 1;
        Ok(())
    }

    fn read_scratchpad(
        &self,
        address: DeviceAddress,
    ) -> Result<Scratchpad, Error> {
        let mut inner = self.inner.lock();
        *inner.scratchpad_reads.entry(address).or_insert(0) += 1;

        if !self.devices.contains(&address) || inner.read_failing.contains(&address) {
            bail!("transaction failed for {}", address);
        }

        // 85*C is the power-on reset value of a real slave that was never
        // asked to convert
        let temperature_celsius = inner
            .temperatures_celsius
            .get(&address)
            .copied()
            .unwrap_or(85.0);

        let raw = (temperature_celsius * 16.0) as i16;
        let raw = raw.to_le_bytes();

        let mut scratchpad = [0u8; Scratchpad::LENGTH];
        scratchpad[0] = raw[0];
        scratchpad[1] = raw[1];
        scratchpad[4] = Resolution::Bits12.configuration_register();

        Ok(Scratchpad::new(scratchpad))
    }
}
