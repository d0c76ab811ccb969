pub mod signal;
pub mod waker;

use std::{collections::HashMap, fmt, hash::Hash};

pub trait Identifier: Clone + Copy + PartialEq + Eq + Hash + fmt::Debug {}

pub type ByIdentifier<'s, I> = HashMap<I, &'s dyn signal::Base>;

pub trait DeviceBase: Send + Sync {
    fn sources_changed_waker(&self) -> Option<&waker::SourcesChangedWaker>;
}
pub trait Device: DeviceBase {
    type Identifier: Identifier;
    fn by_identifier(&self) -> ByIdentifier<'_, Self::Identifier>;
}
