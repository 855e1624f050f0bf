//! dmx universe buffer
//! 固定长度的通道数组，所有设备的数据最终都打包到这里再发送

use super::prelude::*;
use crate::common::error::DriverError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    channels: Vec<DmxValue>,
}

impl Universe {
    /// create a zeroed universe, size must be within 1..=513
    pub fn new(size: usize) -> Result<Self, DriverError> {
        if size == 0 || size > DMX_UNIVERSE_MAX_LEN {
            return Err(DriverError::ChannelIndexOutOfRange {
                index: size,
                len: DMX_UNIVERSE_MAX_LEN,
                context: String::from("universe size must be within 1..=513"),
            });
        }
        Ok(Universe { channels: vec![0; size] })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn as_slice(&self) -> &[DmxValue] {
        &self.channels
    }

    /// 检查 [start, start+length) 是否在 universe 范围内
    pub fn check_range(&self, start: DmxAddress, length: usize) -> Result<(), DriverError> {
        match start.checked_add(length) {
            Some(end) if end <= self.channels.len() => Ok(()),
            _ => Err(DriverError::ChannelIndexOutOfRange {
                index: start.saturating_add(length),
                len: self.channels.len(),
                context: format!("range start = {}, length = {} exceeds universe", start, length),
            }),
        }
    }

    /// copy values into the universe starting at `start`
    pub fn write(&mut self, start: DmxAddress, values: &[DmxValue]) -> Result<(), DriverError> {
        self.check_range(start, values.len())?;
        self.channels[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    pub fn fill(&mut self, value: DmxValue) {
        self.channels.iter_mut().for_each(|c| *c = value);
    }
}
