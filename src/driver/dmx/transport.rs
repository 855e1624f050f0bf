//! 串口传输层
//! - SerialTransport: 真实串口，写入带超时
//! - DummyTransport: dummy 模式下不打开串口，只记录日志

use std::env;
use std::io::Write;
use std::time::Duration;
use data_encoding::HEXLOWER;
use crate::common::error::DriverError;
use crate::{debug, info, trace};

const LOG_TAG: &str = "transport.rs | dmx transport";

/// write-capable byte sink bound to one port
pub trait DmxTransport {
    fn port(&self) -> &str;

    /// one blocking write of a complete frame
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DriverError>;
}

pub type BoxedTransport = Box<dyn DmxTransport + Send>;

/// parameters the transport is opened with
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub serial_port: String,
    pub baudrate: u32,
    pub write_timeout: Duration,
}

pub struct SerialTransport {
    serial_port: String,
    port: Box<dyn tokio_serial::SerialPort>,
}

impl SerialTransport {
    pub fn open(config: &TransportConfig) -> Result<Self, DriverError> {
        let port = tokio_serial::new(config.serial_port.as_str(), config.baudrate)
            .timeout(config.write_timeout)
            .open()
            .map_err(|e| DriverError::PortOpenFailure {
                port: config.serial_port.clone(),
                reason: e.to_string(),
            })?;
        info!(LOG_TAG, "serial port opened: {}, baudrate: {}", config.serial_port, config.baudrate);
        Ok(SerialTransport {
            serial_port: config.serial_port.clone(),
            port,
        })
    }
}

impl DmxTransport for SerialTransport {
    fn port(&self) -> &str {
        &self.serial_port
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        trace!(LOG_TAG, "write {} bytes: {}", frame.len(), HEXLOWER.encode(frame));
        self.port
            .write_all(frame)
            .and_then(|_| self.port.flush())
            .map_err(|e| DriverError::TransportWriteFailure {
                port: self.serial_port.clone(),
                reason: e.to_string(),
            })
    }
}

/// transport used in dummy mode, the port is never opened
pub struct DummyTransport {
    serial_port: String,
}

impl DummyTransport {
    pub fn new(serial_port: &str) -> Self {
        info!(LOG_TAG, "dummy mode, serial port {} will not be open", serial_port);
        DummyTransport { serial_port: serial_port.to_string() }
    }
}

impl DmxTransport for DummyTransport {
    fn port(&self) -> &str {
        &self.serial_port
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        debug!(LOG_TAG, "dummy write to {}: {}", self.serial_port, HEXLOWER.encode(frame));
        Ok(())
    }
}

/// open the transport, `mode=dummy` in the environment skips the real port
pub fn open_transport(config: &TransportConfig) -> Result<BoxedTransport, DriverError> {
    let env_mode = env::var("mode").unwrap_or("real".to_string());
    if env_mode == "dummy" {
        Ok(Box::new(DummyTransport::new(config.serial_port.as_str())))
    } else {
        Ok(Box::new(SerialTransport::open(config)?))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// keeps every written frame, optionally failing writes
    #[derive(Clone, Default)]
    pub struct RecordingTransport {
        pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
        pub fail: Arc<Mutex<bool>>,
    }

    impl RecordingTransport {
        pub fn written(&self) -> Vec<Vec<u8>> {
            self.frames.lock().unwrap().clone()
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl DmxTransport for RecordingTransport {
        fn port(&self) -> &str {
            "recording"
        }

        fn write_frame(&mut self, frame: &[u8]) -> Result<(), DriverError> {
            if *self.fail.lock().unwrap() {
                return Err(DriverError::TransportWriteFailure {
                    port: String::from("recording"),
                    reason: String::from("write timed out"),
                });
            }
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }
}
