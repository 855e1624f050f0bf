//! 传感器宿主
//! 设计
//! - 持有帧历史，实现 Controller 特征，供 listener 查询当前帧和上一帧
//! - add_listener 时同步调用 on_init，失败直接返回给 main
//! - 独立的分发线程按固定间隔从 FrameSource 读帧并回调 listener
//! - remove 时通过 crossbeam 通道通知线程停止，线程调用 on_exit 后退出

use std::collections::{HashSet, VecDeque};
use std::thread;
use std::time::Duration;
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use crate::common::error::DriverError;
use crate::{debug, error, info, warn};
use super::entity::{Frame, GestureType};
use super::traits::{Controller, FrameSource, Listener};

const LOG_TAG: &str = "host.rs | sensor host";

pub type BoxedListener = Box<dyn Listener + Send>;
pub type BoxedSource = Box<dyn FrameSource + Send>;

/// frame history and gesture subscriptions, what a listener sees as the controller
pub struct ControllerState {
    history: VecDeque<Frame>,
    history_len: usize,
    enabled_gestures: HashSet<GestureType>,
}

impl ControllerState {
    pub fn new(history_len: usize) -> Self {
        ControllerState {
            history: VecDeque::new(),
            history_len: history_len.max(2),
            enabled_gestures: HashSet::new(),
        }
    }

    /// make `frame` the newest one, gestures nobody enabled are dropped
    pub fn push_frame(&mut self, mut frame: Frame) {
        frame.gestures.retain(|g| self.is_gesture_enabled(g.gesture_type()));
        self.history.push_front(frame);
        self.history.truncate(self.history_len);
    }
}

impl Controller for ControllerState {
    fn frame(&self, history: usize) -> Option<&Frame> {
        self.history.get(history)
    }

    fn enable_gesture(&mut self, gesture_type: GestureType) {
        debug!(LOG_TAG, "gesture enabled: {:?}", gesture_type);
        self.enabled_gestures.insert(gesture_type);
    }

    fn is_gesture_enabled(&self, gesture_type: GestureType) -> bool {
        self.enabled_gestures.contains(&gesture_type)
    }
}

pub struct SensorController {
    state: ControllerState,
    source: BoxedSource,
    frame_interval: Duration,
    connected: bool,
    exhausted: bool,
}

/// running dispatch thread, remove it to end the session
pub struct ListenerHandle {
    stop_tx: Sender<()>,
    thread_handle: thread::JoinHandle<Result<(), DriverError>>,
}

impl SensorController {
    pub fn new(source: BoxedSource, history_len: usize, frame_interval: Duration) -> Self {
        SensorController {
            state: ControllerState::new(history_len),
            source,
            frame_interval,
            connected: false,
            exhausted: false,
        }
    }

    /// init the listener here, then hand it to the dispatch thread
    pub fn add_listener(mut self, mut listener: BoxedListener) -> Result<ListenerHandle, DriverError> {
        listener.on_init(&mut self.state)?;

        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let thread_handle = thread::spawn(move || {
            info!(LOG_TAG, "dispatch thread started, frame interval: {:?}", self.frame_interval);
            loop {
                match stop_rx.recv_timeout(self.frame_interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        info!(LOG_TAG, "stop signal received, exiting");
                        break;
                    }
                }
                self.pump(listener.as_mut());
            }
            listener.on_exit(&mut self.state)
        });

        Ok(ListenerHandle { stop_tx, thread_handle })
    }

    /// read one frame and deliver it, false once the source is exhausted
    pub fn pump(&mut self, listener: &mut dyn Listener) -> bool {
        if self.exhausted {
            return false;
        }
        let next = match self.source.next_frame() {
            Ok(next) => next,
            Err(e) => {
                error!(LOG_TAG, "cannot read frame, treat sensor as disconnected: {}", e);
                None
            }
        };
        match next {
            Some(frame) => {
                if !self.connected {
                    self.connected = true;
                    info!(LOG_TAG, "sensor connected");
                    if let Err(e) = listener.on_connect(&mut self.state) {
                        error!(LOG_TAG, "on_connect failed: {}", e);
                    }
                }
                self.state.push_frame(frame);
                if let Err(e) = listener.on_frame(&mut self.state) {
                    warn!(LOG_TAG, "on_frame failed, frame skipped: {}", e);
                }
                true
            }
            None => {
                self.exhausted = true;
                if self.connected {
                    info!(LOG_TAG, "sensor disconnected");
                    if let Err(e) = listener.on_disconnect(&mut self.state) {
                        error!(LOG_TAG, "on_disconnect failed: {}", e);
                    }
                }
                false
            }
        }
    }
}

impl ListenerHandle {
    /// stop dispatching, returns the result of on_exit
    pub fn remove(self) -> Result<(), DriverError> {
        let _ = self.stop_tx.send(());
        self.thread_handle
            .join()
            .map_err(|_| DriverError::SensorSource(String::from("dispatch thread panicked")))?
    }
}
