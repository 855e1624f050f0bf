use crate::common::error::DriverError;
use crate::{debug, trace};
use super::prelude::*;
use super::universe::Universe;

const LOG_TAG: &str = "dmx_device.rs | dmx fixture";

/// channelled fixture, a window [start, start+length) of the universe
#[derive(Debug, Clone)]
pub struct DmxDevice {
    device_id: String,
    start: DmxAddress,
    values: Vec<DmxValue>,
}

impl DmxDevice {
    pub fn new(device_id: &str, start: DmxAddress, length: usize) -> Self {
        DmxDevice {
            device_id: device_id.to_string(),
            start,
            values: vec![0; length],
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn start(&self) -> DmxAddress {
        self.start
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// set a relative channel, raw intensity is clamped into 0..=255
    pub fn set(&mut self, channel: usize, value: i32) -> Result<(), DriverError> {
        // check if the channel is out of range
        let len = self.values.len();
        let slot = self.values.get_mut(channel).ok_or_else(|| DriverError::ChannelIndexOutOfRange {
            index: channel,
            len,
            context: format!("device_id = {}", self.device_id),
        })?;
        let clamped = clamp_channel_value(value);
        if clamped as i32 != value {
            debug!(LOG_TAG, "device {} channel {}: value {} clamped to {}", self.device_id, channel, value, clamped);
        }
        *slot = clamped;
        Ok(())
    }

    pub fn get(&self, channel: usize) -> Result<DmxValue, DriverError> {
        self.values.get(channel).copied().ok_or_else(|| DriverError::ChannelIndexOutOfRange {
            index: channel,
            len: self.values.len(),
            context: format!("device_id = {}", self.device_id),
        })
    }

    #[cfg(test)]
    pub fn values(&self) -> &[DmxValue] {
        &self.values
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
    }

    /// copy own values into the universe, other channels are left untouched
    pub fn pack(&self, universe: &mut Universe) -> Result<(), DriverError> {
        universe.write(self.start, &self.values)?;
        trace!(LOG_TAG, "device {} packed at {}: {:?}", self.device_id, self.start, self.values);
        Ok(())
    }

    /// whether two fixtures write to at least one common channel
    pub fn overlaps(&self, other: &DmxDevice) -> bool {
        self.start < other.start + other.len() && other.start < self.start + self.len()
    }
}
