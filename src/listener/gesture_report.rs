//! hand and gesture descriptions for the log
//! 只用于日志输出，不影响通道数据

use std::f32::consts::{FRAC_PI_4, PI};
use crate::sensor::entity::{Gesture, GestureKind, GestureState, Hand, Mm, Orientation, RAD_TO_DEG};

pub fn describe_hand(hand: &Hand) -> String {
    format!(
        "hand sphere radius: {:.2} mm, palm position: {}, pitch: {:.2} degrees, roll: {:.2} degrees, yaw: {:.2} degrees",
        hand.sphere_radius,
        Mm(hand.palm_position),
        hand.direction.pitch() * RAD_TO_DEG,
        hand.palm_normal.roll() * RAD_TO_DEG,
        hand.direction.yaw() * RAD_TO_DEG,
    )
}

/// clockwise when the finger points along the circle normal
pub fn clockwiseness(gesture: &Gesture) -> Option<&'static str> {
    match &gesture.kind {
        GestureKind::Circle { normal, pointable_direction, .. } => {
            if pointable_direction.angle_between(*normal) <= FRAC_PI_4 {
                Some("clockwise")
            } else {
                Some("counterclockwise")
            }
        }
        _ => None,
    }
}

/// radians swept since the same circle in the previous frame
/// 0 on the first update or when the previous frame lost the gesture
pub fn swept_angle(gesture: &Gesture, previous: Option<&Gesture>) -> f32 {
    let progress = match &gesture.kind {
        GestureKind::Circle { progress, .. } => *progress,
        _ => return 0.0,
    };
    if gesture.state == GestureState::Start {
        return 0.0;
    }
    match previous.map(|p| &p.kind) {
        Some(GestureKind::Circle { progress: previous_progress, .. }) => (progress - previous_progress) * 2.0 * PI,
        _ => 0.0,
    }
}

pub fn describe_gesture(gesture: &Gesture, previous: Option<&Gesture>) -> String {
    match &gesture.kind {
        GestureKind::Circle { progress, radius, .. } => format!(
            "circle id: {}, {}, progress: {:.2}, radius: {:.2}, angle: {:.2} degrees, {}",
            gesture.id,
            gesture.state,
            progress,
            radius,
            swept_angle(gesture, previous) * RAD_TO_DEG,
            clockwiseness(gesture).unwrap_or_default(),
        ),
        GestureKind::Swipe { position, direction, speed } => format!(
            "swipe id: {}, {}, position: {}, direction: {}, speed: {:.2}",
            gesture.id, gesture.state, Mm(*position), Mm(*direction), speed
        ),
        GestureKind::KeyTap { position, direction } => format!(
            "key tap id: {}, {}, position: {}, direction: {}",
            gesture.id, gesture.state, Mm(*position), Mm(*direction)
        ),
        GestureKind::ScreenTap { position, direction } => format!(
            "screen tap id: {}, {}, position: {}, direction: {}",
            gesture.id, gesture.state, Mm(*position), Mm(*direction)
        ),
    }
}
