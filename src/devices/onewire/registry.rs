use super::{
    bus::{Bus, Resolution},
    common::DeviceAddress,
};
use anyhow::{Context, Error};
use parking_lot::Mutex;
use std::{collections::HashSet, time::Duration};

// Owns the set of addresses discovered on one bus pin and the subset
// already bound to a temperature device. The sole admission control
// point keeping two devices from sharing one physical sensor.
#[derive(Debug)]
pub struct Registry<'b> {
    bus: &'b dyn Bus,
    resolution: Resolution,

    // discovery order, fixed for the process lifetime
    known: Vec<DeviceAddress>,
    claimed: Mutex<HashSet<DeviceAddress>>,
}
impl<'b> Registry<'b> {
    pub fn new(
        bus: &'b dyn Bus,
        resolution: Resolution,
    ) -> Result<Self, Error> {
        let mut known = Vec::<DeviceAddress>::new();
        for address in bus.enumerate().context("enumerate")? {
            if known.contains(&address) {
                continue;
            }

            log::info!(
                "found 1-wire sensor {address} (family code 0x{:02x})",
                address.family_code()
            );

            // fire and forget, the configuration holds until power cut-off,
            // a failure here is indistinguishable from sensor absence
            if let Err(error) = bus.configure(address, resolution, true) {
                log::debug!("unable to configure 1-wire sensor {address}: {error:?}");
            }

            known.push(address);
        }

        let claimed = HashSet::new();
        let claimed = Mutex::new(claimed);

        Ok(Self {
            bus,
            resolution,
            known,
            claimed,
        })
    }

    pub fn bus(&self) -> &'b dyn Bus {
        self.bus
    }
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
    pub fn conversion_time(&self) -> Duration {
        self.resolution.conversion_time()
    }
    pub fn known(&self) -> &[DeviceAddress] {
        &self.known
    }

    pub fn claim(
        &self,
        address: DeviceAddress,
    ) -> bool {
        if !self.known.contains(&address) {
            return false;
        }
        self.claimed.lock().insert(address)
    }

    pub fn next_unclaimed(&self) -> Option<DeviceAddress> {
        let claimed = self.claimed.lock();
        self.known
            .iter()
            .copied()
            .find(|address| !claimed.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::{super::bus_stub::BusStub, *};

    fn address(index: u8) -> DeviceAddress {
        DeviceAddress::new([0x28, index, 0x64, 0x1e, 0x04, 0x17, 0x03, 0x5f])
    }

    #[test]
    fn discovers_and_configures() {
        let bus = BusStub::new(vec![address(1), address(2)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert_eq!(registry.known(), &[address(1), address(2)]);
        assert_eq!(
            bus.configured(),
            vec![
                (address(1), Resolution::Bits12, true),
                (address(2), Resolution::Bits12, true),
            ]
        );
        assert_eq!(registry.resolution(), Resolution::Bits12);
        assert_eq!(
            registry.conversion_time(),
            Duration::from_micros(750_000)
        );
    }

    #[test]
    fn claim_unknown_rejected() {
        let bus = BusStub::new(vec![address(1)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert!(!registry.claim(address(9)));
        assert_eq!(registry.next_unclaimed(), Some(address(1)));
    }

    #[test]
    fn claim_is_unique() {
        let bus = BusStub::new(vec![address(1), address(2)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert!(registry.claim(address(1)));
        assert!(!registry.claim(address(1)));
        assert!(registry.claim(address(2)));
        assert!(!registry.claim(address(2)));
    }

    #[test]
    fn next_unclaimed_in_discovery_order() {
        let bus = BusStub::new(vec![address(3), address(1), address(2)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert_eq!(registry.next_unclaimed(), Some(address(3)));
        assert!(registry.claim(address(3)));

        assert_eq!(registry.next_unclaimed(), Some(address(1)));
        assert!(registry.claim(address(1)));

        // next_unclaimed by itself does not claim
        assert_eq!(registry.next_unclaimed(), Some(address(2)));
        assert_eq!(registry.next_unclaimed(), Some(address(2)));
    }

    #[test]
    fn exhaustion() {
        let bus = BusStub::new(vec![address(1)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert!(registry.claim(address(1)));
        assert_eq!(registry.next_unclaimed(), None);
    }

    #[test]
    fn duplicate_enumeration_collapsed() {
        let bus = BusStub::new(vec![address(1), address(1), address(2)]);
        let registry = Registry::new(&bus, Resolution::Bits12).unwrap();

        assert_eq!(registry.known(), &[address(1), address(2)]);
    }
}
