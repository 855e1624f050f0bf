use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // 配置文件错误
    ConfigError = 1002,
    // 命令行参数错误
    UsageError = 1004,
}

/// process level error, reported by main
#[derive(Debug)]
pub struct DeviceServerError {
    pub code: ErrorCode,
    pub msg: String,
}

impl Display for DeviceServerError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "device server error code: {}, msg: {}", self.code as u16, self.msg)
    }
}

impl Error for DeviceServerError {}

/// 设备驱动错误
#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// serial port cannot be opened, fatal for the session
    PortOpenFailure { port: String, reason: String },
    /// channel index is past a fixture or past the universe
    ChannelIndexOutOfRange { index: usize, len: usize, context: String },
    /// write to the transport failed or timed out, the frame is dropped
    TransportWriteFailure { port: String, reason: String },
    /// a frame arrived before on_init built the session
    SessionNotInitialized,
    /// sensor frame source cannot be read
    SensorSource(String),
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DriverError::PortOpenFailure { port, reason } => {
                write!(f, "driver error: cannot open port {}, reason: {}", port, reason)
            }
            DriverError::ChannelIndexOutOfRange { index, len, context } => {
                write!(f, "driver error: channel index {} out of range, len = {}, {}", index, len, context)
            }
            DriverError::TransportWriteFailure { port, reason } => {
                write!(f, "driver error: cannot send data to port {}, reason: {}", port, reason)
            }
            DriverError::SessionNotInitialized => {
                write!(f, "driver error: session is not initialized")
            }
            DriverError::SensorSource(msg) => write!(f, "driver error: sensor source, msg: {}", msg),
        }
    }
}

impl Error for DriverError {}
