//! dmx 链路管理
//! 
//! 功能
//! - 持有 universe 数据和所有已注册的设备
//! - send 时按注册顺序把设备数据打包进 universe
//! - 编码为 ENTTEC 帧，阻塞写入串口
//! - dmx 仅支持写而不支持读，所以只有下行数据而无上行数据

use tokio_util::{bytes::BytesMut, codec::Encoder};
use crate::common::error::DriverError;
use crate::{debug, info, warn};
use super::codec::EnttecProCodec;
use super::dmx_device::DmxDevice;
use super::entity::EnttecFrame;
use super::transport::BoxedTransport;
use super::universe::Universe;

const LOG_TAG: &str = "dmx_manager.rs | dmx link";

/// handle of a fixture owned by the manager
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixtureId(usize);

pub struct DmxManager {
    universe: Universe,
    devices: Vec<DmxDevice>,
    transport: BoxedTransport,
    codec: EnttecProCodec,
    buf: BytesMut,
}

impl DmxManager {
    pub fn new(universe: Universe, transport: BoxedTransport) -> Self {
        info!(LOG_TAG, "dmx manager created, port: {}, universe size: {}", transport.port(), universe.len());
        DmxManager {
            universe,
            devices: Vec::new(),
            transport,
            codec: EnttecProCodec,
            buf: BytesMut::new(),
        }
    }

    /// register a fixture, its range has to fit in the universe
    pub fn append(&mut self, device: DmxDevice) -> Result<FixtureId, DriverError> {
        self.universe.check_range(device.start(), device.len())?;
        for other in self.devices.iter().filter(|other| other.overlaps(&device)) {
            warn!(
                LOG_TAG,
                "device {} [{}, {}) overlaps device {} [{}, {}), the later one wins on shared channels",
                device.device_id(), device.start(), device.start() + device.len(),
                other.device_id(), other.start(), other.start() + other.len()
            );
        }
        debug!(LOG_TAG, "append device {}, start = {}, length = {}", device.device_id(), device.start(), device.len());
        self.devices.push(device);
        Ok(FixtureId(self.devices.len() - 1))
    }

    pub fn fixture(&self, id: FixtureId) -> &DmxDevice {
        &self.devices[id.0]
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> &mut DmxDevice {
        &mut self.devices[id.0]
    }

    #[cfg(test)]
    pub fn devices(&self) -> &[DmxDevice] {
        &self.devices
    }

    #[cfg(test)]
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn port(&self) -> &str {
        self.transport.port()
    }

    /// pack every device, encode the universe and write one frame
    pub fn send(&mut self) -> Result<(), DriverError> {
        for device in self.devices.iter() {
            device.pack(&mut self.universe)?;
        }
        self.buf.clear();
        self.codec
            .encode(EnttecFrame::send_dmx(&self.universe), &mut self.buf)
            .map_err(|e| DriverError::TransportWriteFailure {
                port: self.transport.port().to_string(),
                reason: e.to_string(),
            })?;
        self.transport.write_frame(&self.buf)
    }

    /// zero every device and push one frame
    pub fn blackout(&mut self) -> Result<(), DriverError> {
        self.devices.iter_mut().for_each(|device| device.clear());
        self.universe.fill(0);
        info!(LOG_TAG, "blackout on port {}", self.transport.port());
        self.send()
    }
}
