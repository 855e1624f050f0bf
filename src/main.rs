mod common;
mod driver;
mod sensor;
mod listener;
use common::setting::Settings;
use common::logger::init_logger;
use common::error::{DeviceServerError, ErrorCode};
use listener::dmx_leap_listener::{DmxLeapListener, ListenerConfig};
use sensor::host::{BoxedSource, SensorController};
use sensor::source::{ReplaySource, SweepSource};
use std::error::Error;
use std::io;
use std::thread;
use std::time::Duration;
use dotenv::dotenv;

const LOG_TAG: &str = "main";
const USAGE: &str = "usage: gesture-dmx-engine-rs <serial port>";

fn main() -> Result<(), Box<dyn Error>> {
    // 检查 env 文件
    dotenv().ok();

    // 加载 config
    let settings = Settings::get();

    // 设置 logger
    init_logger()?;
    info!(LOG_TAG, "settings loaded, env: {}", settings.env.env);
    debug!(LOG_TAG, "settings: {:?}", settings);

    let serial_port = parse_args(std::env::args())?;

    let frame_interval = Duration::from_millis(settings.sensor.frame_interval_millis);
    let controller = SensorController::new(build_source(settings, frame_interval)?, settings.sensor.history_len, frame_interval);
    let listener = DmxLeapListener::new(ListenerConfig::from_settings(&serial_port, settings));

    // on_init 在这里同步执行，串口打不开直接退出
    let handle = controller.add_listener(Box::new(listener)).map_err(|e| {
        error!(LOG_TAG, "cannot start session: {}", e);
        e
    })?;

    // Enter 或 ctrl-c 结束会话
    let (quit_tx, quit_rx) = crossbeam::channel::bounded::<()>(2);
    let ctrlc_tx = quit_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.try_send(());
    })?;
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let _ = quit_tx.try_send(());
    });

    println!("Press Enter to quit...");
    let _ = quit_rx.recv();

    handle.remove()?;
    info!(LOG_TAG, "session ended");
    Ok(())
}

/// the only argument is the serial port
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<String, DeviceServerError> {
    let _program = args.next();
    match (args.next(), args.next()) {
        (Some(port), None) if !port.starts_with('-') => Ok(port),
        _ => Err(DeviceServerError {
            code: ErrorCode::UsageError,
            msg: USAGE.to_string(),
        }),
    }
}

fn build_source(settings: &Settings, frame_interval: Duration) -> Result<BoxedSource, Box<dyn Error>> {
    match settings.sensor.replay_file.as_deref() {
        Some(path) => Ok(Box::new(ReplaySource::open(path, settings.sensor.replay_loop)?)),
        None => Ok(Box::new(SweepSource::new(
            settings.sensor.sweep_amplitude,
            Duration::from_millis(settings.sensor.sweep_period_millis),
            frame_interval,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&["engine", "COM3"])).unwrap(), "COM3");
        assert_eq!(parse_args(args(&["engine", "/dev/ttyUSB0"])).unwrap(), "/dev/ttyUSB0");
    }

    #[test]
    fn test_parse_args_usage() {
        assert_eq!(parse_args(args(&["engine"])).unwrap_err().code, ErrorCode::UsageError);
        assert_eq!(parse_args(args(&["engine", "COM3", "COM4"])).unwrap_err().code, ErrorCode::UsageError);
        assert_eq!(parse_args(args(&["engine", "--port"])).unwrap_err().code, ErrorCode::UsageError);
    }
}
