use super::{
    bus::DEVICE_DISCONNECTED_C,
    common::DeviceAddress,
    registry::Registry,
};
use crate::{
    datatypes::temperature::{Temperature, Unit},
    devices,
    signals::{self, signal},
    util::{
        async_flag,
        runnable::{Exited, Runnable},
    },
};
use async_trait::async_trait;
use futures::{FutureExt, pin_mut, select};
use maplit::hashmap;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, cmp::max, time::Duration};

// Keeps the scratchpad read clear of the in-progress hardware conversion.
pub const READ_INTERVAL_MARGIN: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct Configuration {
    pub read_interval: Duration,
}

// Persistence blob exchanged with the configuration store. `address` is
// the writable part, restart-only; `found` reflects the current binding
// and is ignored on load.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct AddressRecord {
    #[serde(default)]
    pub address: Option<DeviceAddress>,
    #[serde(default)]
    pub found: bool,
}

// One logical measurement point. Binds exactly one bus address for its
// whole lifetime at construction, then runs the two-phase
// (convert, delayed read) acquisition cycle forever.
#[derive(Debug)]
pub struct Device<'r> {
    registry: &'r Registry<'r>,
    address: Option<DeviceAddress>,
    read_interval: Duration,

    signals_sources_changed_waker: signals::waker::SourcesChangedWaker,
    signal_output: signal::state_source::Signal<Temperature>,
}
impl<'r> Device<'r> {
    pub fn new(
        registry: &'r Registry<'r>,
        configuration: Configuration,
        persisted: Option<DeviceAddress>,
    ) -> Self {
        let address = match persisted {
            Some(address) => {
                if registry.claim(address) {
                    Some(address)
                } else {
                    log::error!(
                        "1-wire sensor {address} is missing, \
                         check the physical wiring of your sensors"
                    );
                    None
                }
            }
            None => match registry.next_unclaimed() {
                Some(address) => {
                    let claimed = registry.claim(address);
                    debug_assert!(claimed, "freshly allocated address must be claimable");
                    log::debug!("bound previously unconfigured 1-wire sensor {address}");
                    Some(address)
                }
                None => {
                    log::error!(
                        "unable to allocate a 1-wire sensor, \
                         all discovered sensors are already bound, \
                         check the physical wiring of your sensors"
                    );
                    None
                }
            },
        };

        let read_interval = max(
            configuration.read_interval,
            registry.conversion_time() + READ_INTERVAL_MARGIN,
        );

        Self {
            registry,
            address,
            read_interval,

            signals_sources_changed_waker: signals::waker::SourcesChangedWaker::new(),
            signal_output: signal::state_source::Signal::<Temperature>::new(None),
        }
    }

    pub fn address(&self) -> Option<DeviceAddress> {
        self.address
    }
    pub fn found(&self) -> bool {
        self.address.is_some()
    }
    // floor-clamped to conversion time + margin, fixed at bind time
    pub fn read_interval(&self) -> Duration {
        self.read_interval
    }
    pub fn address_record(&self) -> AddressRecord {
        AddressRecord {
            address: self.address,
            found: self.found(),
        }
    }

    fn read_phase(
        &self,
        address: DeviceAddress,
    ) {
        let scratchpad = match self.registry.bus().read_scratchpad(address) {
            Ok(scratchpad) => scratchpad,
            Err(error) => {
                log::warn!("failed to read 1-wire sensor {address}: {error:?}");
                return;
            }
        };

        let temperature_celsius = scratchpad.temperature_celsius();

        // the conversion wait always exceeds worst-case conversion time, so
        // a genuine not-ready reading cannot appear here, but the
        // disconnected sentinel can, even on a successful transaction
        if temperature_celsius == DEVICE_DISCONNECTED_C {
            log::warn!("failed to read 1-wire sensor {address}: device disconnected");
            return;
        }

        let temperature = Temperature::new(Unit::Celsius, temperature_celsius);
        if self.signal_output.set_one(Some(temperature)) {
            self.signals_sources_changed_waker.wake();
        }
    }

    async fn run(
        &self,
        mut exit_flag: async_flag::Receiver,
    ) -> Exited {
        let address = match self.address {
            Some(address) => address,
            // binding failed at construction, never schedule anything
            None => {
                (&mut exit_flag).await;
                return Exited;
            }
        };

        let conversion_time = self.registry.conversion_time();

        loop {
            // convert phase
            if let Err(error) = self.registry.bus().start_conversion(address) {
                log::warn!("unable to start conversion on 1-wire sensor {address}: {error:?}");
            }

            let conversion_timer = tokio::time::sleep(conversion_time);
            pin_mut!(conversion_timer);
            let mut conversion_timer = conversion_timer.fuse();

            select! {
                () = conversion_timer => {},
                () = exit_flag => break,
            }

            // read phase
            self.read_phase(address);

            // remainder of the read interval until the next conversion
            let interval_timer = tokio::time::sleep(self.read_interval - conversion_time);
            pin_mut!(interval_timer);
            let mut interval_timer = interval_timer.fuse();

            select! {
                () = interval_timer => {},
                () = exit_flag => break,
            }
        }

        Exited
    }
}

impl<'r> devices::Device for Device<'r> {
    fn class(&self) -> Cow<'static, str> {
        Cow::from("onewire/temperature_a")
    }

    fn as_runnable(&self) -> Option<&dyn Runnable> {
        Some(self)
    }
    fn as_signals_device_base(&self) -> Option<&dyn signals::DeviceBase> {
        Some(self)
    }
}

#[async_trait]
impl<'r> Runnable for Device<'r> {
    async fn run(
        &self,
        exit_flag: async_flag::Receiver,
    ) -> Exited {
        self.run(exit_flag).await
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SignalIdentifier {
    Output,
}
impl signals::Identifier for SignalIdentifier {}
impl<'r> signals::DeviceBase for Device<'r> {
    fn sources_changed_waker(&self) -> Option<&signals::waker::SourcesChangedWaker> {
        Some(&self.signals_sources_changed_waker)
    }
}
impl<'r> signals::Device for Device<'r> {
    type Identifier = SignalIdentifier;
    fn by_identifier(&self) -> signals::ByIdentifier<'_, Self::Identifier> {
        hashmap! {
            SignalIdentifier::Output => &self.signal_output as &dyn signal::Base,
        }
    }
}
