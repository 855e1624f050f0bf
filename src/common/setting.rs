//! setting config file
//! 配置文件为 config_{ENV}.toml，ENV 默认为 dev

use std::{fs::File, io::Read};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::env;
use super::error::{DeviceServerError, ErrorCode};
use crate::driver::dmx::prelude::DMX_UNIVERSE_DEFAULT_LEN;

#[derive(Debug, Deserialize, Clone)]
pub struct Env {
    pub env: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Dmx {
    /// ENTTEC payload size, including the start code slot
    pub universe_size: usize,
    pub baudrate: u32,
    pub write_timeout_millis: u64,
    /// sleep after every send, caps the output rate
    pub throttle_millis: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Sensor {
    pub frame_interval_millis: u64,
    pub history_len: usize,
    /// json lines recording, the synthetic sweep is used when absent
    pub replay_file: Option<String>,
    pub replay_loop: bool,
    pub sweep_amplitude: f32,
    pub sweep_period_millis: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub env: Env,
    pub dmx: Dmx,
    pub sensor: Sensor,
}

impl Default for Settings {
    fn default() -> Self {
        let env = match env::var("ENV") {
            Ok(e) => e,
            Err(_) => String::from("dev"),
        };

        let file_path: String = format!("config_{}.toml", env);

        match Settings::load(file_path.as_str()) {
            Ok(settings) => settings,
            Err(e) => {
                // logger is not ready yet, the logger itself reads these settings
                eprintln!("{}, use built-in settings", e);
                Settings::builtin()
            }
        }
    }
}

impl Settings {
    pub fn get<'a>() -> &'a Self {
        // 给静态变量延迟赋值的宏
        lazy_static! {
            static ref CACHE: Settings = Settings::default();
        }
        &CACHE
    }

    /// read and parse a toml config file
    pub fn load(file_path: &str) -> Result<Settings, DeviceServerError> {
        let mut file = File::open(file_path).map_err(|e| DeviceServerError {
            code: ErrorCode::ConfigError,
            msg: format!("no such file {} exception: {}", file_path, e),
        })?;

        let mut str_val = String::new();
        file.read_to_string(&mut str_val).map_err(|e| DeviceServerError {
            code: ErrorCode::ConfigError,
            msg: format!("cannot read config file {}: {}", file_path, e),
        })?;

        Settings::parse(&str_val)
    }

    pub fn parse(content: &str) -> Result<Settings, DeviceServerError> {
        toml::from_str(content).map_err(|e| DeviceServerError {
            code: ErrorCode::ConfigError,
            msg: format!("config file format invalid: {}", e),
        })
    }

    /// values used when no config file can be loaded
    pub fn builtin() -> Settings {
        Settings {
            env: Env {
                env: String::from("dev"),
                log_level: String::from("info"),
            },
            dmx: Dmx {
                universe_size: DMX_UNIVERSE_DEFAULT_LEN,
                baudrate: 57600,
                write_timeout_millis: 100,
                throttle_millis: 10,
            },
            sensor: Sensor {
                frame_interval_millis: 8,
                history_len: 60,
                replay_file: None,
                replay_loop: true,
                sweep_amplitude: 120.0,
                sweep_period_millis: 4000,
            },
        }
    }
}
