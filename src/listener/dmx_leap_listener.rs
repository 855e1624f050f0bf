//! 手势灯光 listener
//!
//! 功能
//! - on_init: 打开串口，创建 dmx 链路和两个灯具
//! - on_connect: 订阅 circle / key tap / screen tap / swipe 手势
//! - on_frame: 第一只手的指尖平均位置映射为两个灯的亮度，发送后节流等待
//! - on_exit: 关灯并结束会话
//! - 手的姿态和手势只输出日志

use std::thread;
use std::time::Duration;
use crate::common::error::DriverError;
use crate::common::setting::Settings;
use crate::driver::dmx::dmx_device::DmxDevice;
use crate::driver::dmx::dmx_manager::{DmxManager, FixtureId};
use crate::driver::dmx::transport::{open_transport, BoxedTransport, TransportConfig};
use crate::driver::dmx::universe::Universe;
use crate::sensor::entity::{GestureType, Mm};
use crate::sensor::traits::{Controller, Listener};
use crate::{debug, error, info};
use super::gesture_report::{describe_gesture, describe_hand};
use super::mapper::{map_intensity, HandSample, Intensity};

const LOG_TAG: &str = "dmx_leap_listener.rs | gesture listener";

// fixture layout of the rig, light_1 shares channel 2 with light_0
const LIGHT_0_START: usize = 1;
const LIGHT_1_START: usize = 2;
const LIGHT_CHANNELS: usize = 2;

const SUBSCRIBED_GESTURES: [GestureType; 4] = [
    GestureType::Circle,
    GestureType::KeyTap,
    GestureType::ScreenTap,
    GestureType::Swipe,
];

pub type TransportOpener = Box<dyn Fn(&TransportConfig) -> Result<BoxedTransport, DriverError> + Send>;

#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub transport: TransportConfig,
    pub universe_size: usize,
    /// sleep after each send
    pub throttle: Duration,
}

impl ListenerConfig {
    pub fn from_settings(serial_port: &str, settings: &Settings) -> Self {
        ListenerConfig {
            transport: TransportConfig {
                serial_port: serial_port.to_string(),
                baudrate: settings.dmx.baudrate,
                write_timeout: Duration::from_millis(settings.dmx.write_timeout_millis),
            },
            universe_size: settings.dmx.universe_size,
            throttle: Duration::from_millis(settings.dmx.throttle_millis),
        }
    }
}

/// state built by on_init, lives until on_exit
struct Session {
    manager: DmxManager,
    light_0: FixtureId,
    light_1: FixtureId,
}

impl Session {
    fn apply(&mut self, intensity: Intensity) -> Result<(), DriverError> {
        self.manager.fixture_mut(self.light_0).set(0, intensity.light_0)?;
        self.manager.fixture_mut(self.light_1).set(0, intensity.light_1)?;
        debug!(
            LOG_TAG,
            "light_0 = {}, light_1 = {}",
            self.manager.fixture(self.light_0).get(0)?,
            self.manager.fixture(self.light_1).get(0)?
        );
        self.manager.send()
    }
}

pub struct DmxLeapListener {
    config: ListenerConfig,
    opener: TransportOpener,
    session: Option<Session>,
    frames_sent: u64,
    frames_dropped: u64,
}

impl DmxLeapListener {
    pub fn new(config: ListenerConfig) -> Self {
        Self::with_opener(config, Box::new(open_transport))
    }

    pub fn with_opener(config: ListenerConfig, opener: TransportOpener) -> Self {
        DmxLeapListener {
            config,
            opener,
            session: None,
            frames_sent: 0,
            frames_dropped: 0,
        }
    }
}

impl Listener for DmxLeapListener {
    fn on_init(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {
        let transport = (self.opener)(&self.config.transport)?;
        let mut manager = DmxManager::new(Universe::new(self.config.universe_size)?, transport);
        let light_0 = manager.append(DmxDevice::new("light_0", LIGHT_0_START, LIGHT_CHANNELS))?;
        let light_1 = manager.append(DmxDevice::new("light_1", LIGHT_1_START, LIGHT_CHANNELS))?;
        self.session = Some(Session { manager, light_0, light_1 });
        info!(LOG_TAG, "initialized, port: {}", self.config.transport.serial_port);
        Ok(())
    }

    fn on_connect(&mut self, controller: &mut dyn Controller) -> Result<(), DriverError> {
        info!(LOG_TAG, "connected");
        for gesture_type in SUBSCRIBED_GESTURES {
            controller.enable_gesture(gesture_type);
        }
        Ok(())
    }

    fn on_disconnect(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {
        info!(LOG_TAG, "disconnected");
        Ok(())
    }

    fn on_exit(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.manager.blackout() {
                error!(LOG_TAG, "blackout on exit failed: {}", e);
            }
            info!(LOG_TAG, "port {} released", session.manager.port());
        }
        info!(LOG_TAG, "exited, frames sent: {}, frames dropped: {}", self.frames_sent, self.frames_dropped);
        Ok(())
    }

    fn on_frame(&mut self, controller: &mut dyn Controller) -> Result<(), DriverError> {
        let session = self.session.as_mut().ok_or(DriverError::SessionNotInitialized)?;
        let frame = match controller.frame(0) {
            Some(frame) => frame,
            None => return Ok(()),
        };

        if let Some(hand) = frame.hands.first() {
            if let Some(sample) = HandSample::from_hand(hand) {
                debug!(
                    LOG_TAG,
                    "hand has {} fingers, average finger tip position: {}",
                    sample.finger_count, Mm(sample.average_tip_position)
                );
                match session.apply(map_intensity(sample.average_tip_position.x)) {
                    Ok(()) => self.frames_sent += 1,
                    Err(e @ DriverError::TransportWriteFailure { .. }) => {
                        // next frame overwrites it anyway
                        error!(LOG_TAG, "frame {} dropped: {}", frame.id, e);
                        self.frames_dropped += 1;
                    }
                    Err(e) => return Err(e),
                }
                if !self.config.throttle.is_zero() {
                    thread::sleep(self.config.throttle);
                }
            }
            debug!(LOG_TAG, "{}", describe_hand(hand));
        }

        let previous = controller.frame(1);
        for gesture in frame.gestures.iter() {
            let previous_gesture = previous.and_then(|p| p.gesture(gesture.id));
            info!(LOG_TAG, "{}", describe_gesture(gesture, previous_gesture));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::logger::init_logger;
    use crate::driver::dmx::transport::testing::RecordingTransport;
    use crate::sensor::entity::{Finger, Frame, Gesture, GestureKind, GestureState, Hand};
    use glam::Vec3;
    use crate::sensor::host::ControllerState;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    fn set_env() -> (DmxLeapListener, RecordingTransport, Arc<Mutex<Vec<String>>>) {
        set_env_with_throttle(Duration::ZERO)
    }

    fn set_env_with_throttle(throttle: Duration) -> (DmxLeapListener, RecordingTransport, Arc<Mutex<Vec<String>>>) {
        let _ = init_logger();
        let transport = RecordingTransport::default();
        let opened = Arc::new(Mutex::new(Vec::new()));
        let opener_transport = transport.clone();
        let opener_ports = opened.clone();
        let opener: TransportOpener = Box::new(move |config: &TransportConfig| {
            opener_ports.lock().unwrap().push(config.serial_port.clone());
            Ok(Box::new(opener_transport.clone()) as BoxedTransport)
        });
        let mut config = ListenerConfig::from_settings("COM3", &Settings::builtin());
        config.throttle = throttle;
        (DmxLeapListener::with_opener(config, opener), transport, opened)
    }

    fn hand_frame(id: i64, xs: &[f32]) -> Frame {
        let fingers = xs
            .iter()
            .enumerate()
            .map(|(i, x)| Finger { id: i as i32, tip_position: Vec3::new(*x, 180.0, -30.0), direction: Vec3::ZERO })
            .collect();
        Frame {
            id,
            hands: vec![Hand {
                id: 1,
                palm_position: Vec3::new(0.0, 160.0, 0.0),
                palm_normal: Vec3::new(0.0, -1.0, 0.0),
                direction: Vec3::new(0.0, 0.0, -1.0),
                sphere_radius: 70.0,
                fingers,
            }],
            ..Frame::default()
        }
    }

    fn light_values(listener: &DmxLeapListener) -> (u8, u8) {
        let session = listener.session.as_ref().unwrap();
        (
            session.manager.fixture(session.light_0).get(0).unwrap(),
            session.manager.fixture(session.light_1).get(0).unwrap(),
        )
    }

    #[test]
    fn test_init_layout() {
        let (mut listener, _, opened) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        assert_eq!(opened.lock().unwrap().as_slice(), &["COM3".to_string()]);
        let session = listener.session.as_ref().unwrap();
        let layout: Vec<(usize, usize)> = session.manager.devices().iter().map(|d| (d.start(), d.len())).collect();
        assert_eq!(layout, vec![(1, 2), (2, 2)]);
        assert_eq!(session.manager.universe().len(), 128);
    }

    #[test]
    fn test_init_port_failure() {
        let _ = init_logger();
        let opener: TransportOpener = Box::new(|config: &TransportConfig| {
            Err(DriverError::PortOpenFailure { port: config.serial_port.clone(), reason: String::from("no such device") })
        });
        let mut listener = DmxLeapListener::with_opener(ListenerConfig::from_settings("COM3", &Settings::builtin()), opener);
        let mut controller = ControllerState::new(60);
        assert!(matches!(listener.on_init(&mut controller), Err(DriverError::PortOpenFailure { .. })));
        assert!(listener.session.is_none());
    }

    #[test]
    fn test_connect_subscribes_gestures() {
        let (mut listener, _, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_connect(&mut controller).unwrap();
        for gesture_type in SUBSCRIBED_GESTURES {
            assert!(controller.is_gesture_enabled(gesture_type));
        }
    }

    #[test]
    fn test_frame_drives_lights() {
        let (mut listener, transport, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();
        listener.on_connect(&mut controller).unwrap();

        controller.push_frame(hand_frame(1, &[10.0, 30.0]));
        listener.on_frame(&mut controller).unwrap();

        assert_eq!(light_values(&listener), (80, 120));
        let frames = transport.written();
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.len(), 133);
        assert_eq!(&frame[..4], &[0x7e, 0x06, 0x80, 0x00]);
        // channel 1 light_0, channel 2 light_1 (shared), channel 3 light_1
        assert_eq!(&frame[4..8], &[0, 80, 120, 0]);
        assert_eq!(frame[132], 0xe7);
    }

    #[test]
    fn test_throttle_after_send() {
        // default rig throttle
        let throttle = Settings::builtin().dmx.throttle_millis;
        assert_eq!(throttle, 10);
        let (mut listener, transport, _) = set_env_with_throttle(Duration::from_millis(throttle));
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        controller.push_frame(hand_frame(1, &[20.0]));
        let started = Instant::now();
        listener.on_frame(&mut controller).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(transport.written().len(), 1);
    }

    #[test]
    fn test_no_throttle_without_send() {
        let (mut listener, transport, _) = set_env_with_throttle(Duration::from_secs(2));
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        controller.push_frame(Frame { id: 1, ..Frame::default() });
        let started = Instant::now();
        listener.on_frame(&mut controller).unwrap();
        controller.push_frame(hand_frame(2, &[]));
        listener.on_frame(&mut controller).unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(transport.written().is_empty());
    }

    #[test]
    fn test_frame_clamps_far_hand() {
        let (mut listener, _, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        controller.push_frame(hand_frame(1, &[300.0]));
        listener.on_frame(&mut controller).unwrap();
        assert_eq!(light_values(&listener), (200, 255));
    }

    #[test]
    fn test_frame_without_fingers_is_noop() {
        let (mut listener, transport, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        controller.push_frame(Frame { id: 1, ..Frame::default() });
        listener.on_frame(&mut controller).unwrap();
        controller.push_frame(hand_frame(2, &[]));
        listener.on_frame(&mut controller).unwrap();

        assert!(transport.written().is_empty());
        assert_eq!(light_values(&listener), (0, 0));
    }

    #[test]
    fn test_write_failure_keeps_session() {
        let (mut listener, transport, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();

        transport.set_fail(true);
        controller.push_frame(hand_frame(1, &[0.0]));
        assert!(listener.on_frame(&mut controller).is_ok());
        assert_eq!(listener.frames_dropped, 1);

        transport.set_fail(false);
        controller.push_frame(hand_frame(2, &[0.0]));
        listener.on_frame(&mut controller).unwrap();
        assert_eq!(listener.frames_sent, 1);
        assert_eq!(transport.written().len(), 1);
    }

    #[test]
    fn test_gestures_do_not_touch_lights() {
        let (mut listener, transport, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();
        listener.on_connect(&mut controller).unwrap();

        let mut frame = Frame { id: 1, ..Frame::default() };
        frame.gestures.push(Gesture {
            id: 3,
            state: GestureState::Update,
            kind: GestureKind::Circle {
                progress: 0.5,
                radius: 20.0,
                normal: Vec3::new(0.0, 0.0, 1.0),
                pointable_direction: Vec3::new(0.0, 0.0, 1.0),
            },
        });
        controller.push_frame(frame);
        listener.on_frame(&mut controller).unwrap();
        assert!(transport.written().is_empty());
    }

    #[test]
    fn test_frame_before_init() {
        let (mut listener, _, _) = set_env();
        let mut controller = ControllerState::new(60);
        controller.push_frame(hand_frame(1, &[0.0]));
        assert_eq!(listener.on_frame(&mut controller), Err(DriverError::SessionNotInitialized));
    }

    #[test]
    fn test_exit_blackout() {
        let (mut listener, transport, _) = set_env();
        let mut controller = ControllerState::new(60);
        listener.on_init(&mut controller).unwrap();
        controller.push_frame(hand_frame(1, &[-50.0]));
        listener.on_frame(&mut controller).unwrap();
        listener.on_exit(&mut controller).unwrap();

        let frames = transport.written();
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0][4..8], &[0, 150, 50, 0]);
        assert!(frames[1][4..132].iter().all(|b| *b == 0));
        assert!(listener.session.is_none());
    }
}
