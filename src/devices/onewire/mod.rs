pub mod bus;
pub mod bus_stub;
pub mod common;
pub mod registry;
pub mod temperature;
