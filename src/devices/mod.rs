pub mod onewire;

use crate::{signals, util::runnable::Runnable};
use std::{borrow::Cow, fmt};

pub trait Device: Send + Sync + fmt::Debug {
    fn class(&self) -> Cow<'static, str>;

    fn as_runnable(&self) -> Option<&dyn Runnable> {
        None
    }
    fn as_signals_device_base(&self) -> Option<&dyn signals::DeviceBase> {
        None
    }
}
