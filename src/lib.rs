#![allow(clippy::new_without_default)]

pub mod datatypes;
pub mod devices;
pub mod signals;
pub mod util;
