pub mod mapper;
pub mod gesture_report;
pub mod dmx_leap_listener;
