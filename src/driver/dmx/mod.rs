pub mod prelude;
pub mod entity;
pub mod universe;
pub mod dmx_device;
pub mod codec;
pub mod transport;
pub mod dmx_manager;
