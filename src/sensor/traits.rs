use crate::common::error::DriverError;
use super::entity::{Frame, GestureType};

/// capabilities of the tracking runtime a listener may call back into
pub trait Controller {
    /// `history` 0 is the newest frame, 1 the one before it
    fn frame(&self, history: usize) -> Option<&Frame>;

    /// ask the runtime to report a gesture type
    fn enable_gesture(&mut self, gesture_type: GestureType);

    fn is_gesture_enabled(&self, gesture_type: GestureType) -> bool;
}

/// tracking runtime lifecycle hooks
/// all hooks of one listener are called from the same dispatch thread
pub trait Listener {
    /// listener added to the controller, errors abort the session
    fn on_init(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {Ok(())}

    /// sensor connected, first frame is about to arrive
    fn on_connect(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {Ok(())}

    /// sensor lost, may never be called
    fn on_disconnect(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {Ok(())}

    /// listener removed, last hook of the session
    fn on_exit(&mut self, _controller: &mut dyn Controller) -> Result<(), DriverError> {Ok(())}

    /// a new frame is available as `controller.frame(0)`
    fn on_frame(&mut self, controller: &mut dyn Controller) -> Result<(), DriverError>;
}

/// where the host reads tracking frames from
pub trait FrameSource {
    /// `None` once the sensor is gone
    fn next_frame(&mut self) -> Result<Option<Frame>, DriverError>;
}
