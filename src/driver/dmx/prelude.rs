// dmx channel type
pub type DmxValue = u8;
// dmx address type, offset into the universe
pub type DmxAddress = usize;
// largest ENTTEC payload: start code + 512 channels
pub const DMX_UNIVERSE_MAX_LEN: usize = 513;
// universe size used by the gesture rig
pub const DMX_UNIVERSE_DEFAULT_LEN: usize = 128;

/// clamp a raw intensity into the dmx channel range
pub fn clamp_channel_value(value: i32) -> DmxValue {
    value.clamp(DmxValue::MIN as i32, DmxValue::MAX as i32) as DmxValue
}
