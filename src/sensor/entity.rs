//! tracking frame data delivered by the sensor runtime
//! 坐标单位为毫米，原点在传感器中心，y 轴向上，z 轴指向操作者

use std::f32::consts::PI;
use std::fmt::{self, Display, Formatter};
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const RAD_TO_DEG: f32 = 180.0 / PI;

/// hand orientation angles of a direction vector, in radians
pub trait Orientation {
    /// angle above the horizontal plane, around the x axis
    fn pitch(&self) -> f32;
    /// angle around the y axis
    fn yaw(&self) -> f32;
    /// angle around the z axis
    fn roll(&self) -> f32;
}

impl Orientation for Vec3 {
    fn pitch(&self) -> f32 {
        self.y.atan2(-self.z)
    }

    fn yaw(&self) -> f32 {
        self.x.atan2(-self.z)
    }

    fn roll(&self) -> f32 {
        self.x.atan2(-self.y)
    }
}

/// log formatting of a position or direction, `(x, y, z)`
pub struct Mm(pub Vec3);

impl Display for Mm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.0.x, self.0.y, self.0.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finger {
    pub id: i32,
    pub tip_position: Vec3,
    #[serde(default)]
    pub direction: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub id: i32,
    #[serde(default)]
    pub palm_position: Vec3,
    #[serde(default)]
    pub palm_normal: Vec3,
    #[serde(default)]
    pub direction: Vec3,
    #[serde(default)]
    pub sphere_radius: f32,
    #[serde(default)]
    pub fingers: Vec<Finger>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    Circle,
    Swipe,
    KeyTap,
    ScreenTap,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Start,
    Update,
    Stop,
    Invalid,
}

impl Display for GestureState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            GestureState::Start => "STATE_START",
            GestureState::Update => "STATE_UPDATE",
            GestureState::Stop => "STATE_STOP",
            GestureState::Invalid => "STATE_INVALID",
        };
        write!(f, "{}", s)
    }
}

/// type specific gesture data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureKind {
    Circle {
        /// number of full turns so far
        progress: f32,
        radius: f32,
        normal: Vec3,
        /// direction of the finger drawing the circle
        pointable_direction: Vec3,
    },
    Swipe {
        position: Vec3,
        direction: Vec3,
        speed: f32,
    },
    KeyTap {
        position: Vec3,
        direction: Vec3,
    },
    ScreenTap {
        position: Vec3,
        direction: Vec3,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: i32,
    pub state: GestureState,
    #[serde(flatten)]
    pub kind: GestureKind,
}

impl Gesture {
    pub fn gesture_type(&self) -> GestureType {
        match self.kind {
            GestureKind::Circle { .. } => GestureType::Circle,
            GestureKind::Swipe { .. } => GestureType::Swipe,
            GestureKind::KeyTap { .. } => GestureType::KeyTap,
            GestureKind::ScreenTap { .. } => GestureType::ScreenTap,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: i64,
    /// microseconds
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub hands: Vec<Hand>,
    #[serde(default)]
    pub gestures: Vec<Gesture>,
}

impl Frame {
    pub fn gesture(&self, id: i32) -> Option<&Gesture> {
        self.gestures.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_display() {
        assert_eq!(Mm(Vec3::new(20.0, 10.0, -2.5)).to_string(), "(20.00, 10.00, -2.50)");
    }

    #[test]
    fn test_orientation() {
        // pointing forward, away from the operator
        let forward = Vec3::new(0.0, 0.0, -1.0);
        assert!(approx(forward.pitch(), 0.0));
        assert!(approx(forward.yaw(), 0.0));
        assert!(approx(Vec3::new(0.0, 1.0, -1.0).pitch(), PI / 4.0));
        assert!(approx(Vec3::new(1.0, 0.0, -1.0).yaw(), PI / 4.0));
        assert!(approx(Vec3::new(0.0, -1.0, 0.0).roll(), 0.0));
    }

    #[test]
    fn test_frame_json() {
        let json = r#"{
            "id": 7,
            "timestamp": 1000,
            "hands": [{"id": 1, "palm_position": [0, 200, 0], "sphere_radius": 80.5,
                       "fingers": [{"id": 10, "tip_position": [15, 210, -5]}]}],
            "gestures": [
                {"id": 3, "state": "update", "type": "circle", "progress": 1.25, "radius": 30,
                 "normal": [0, 0, 1], "pointable_direction": [0, 0, -1]},
                {"id": 4, "state": "stop", "type": "key_tap", "position": [0, 0, 0], "direction": [0, -1, 0]}
            ]
        }"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.id, 7);
        assert_eq!(frame.hands[0].fingers.len(), 1);
        assert_eq!(frame.hands[0].fingers[0].tip_position, Vec3::new(15.0, 210.0, -5.0));
        assert_eq!(frame.hands[0].palm_normal, Vec3::ZERO);
        assert_eq!(frame.gesture(3).unwrap().gesture_type(), GestureType::Circle);
        assert_eq!(frame.gesture(4).unwrap().state, GestureState::Stop);
        assert!(frame.gesture(5).is_none());
    }

    #[test]
    fn test_vec3_json_is_array() {
        let finger = Finger { id: 1, tip_position: Vec3::new(1.0, 2.0, 3.0), direction: Vec3::ZERO };
        let json = serde_json::to_string(&finger).unwrap();
        assert!(json.contains("\"tip_position\":[1.0,2.0,3.0]"));
    }

    #[test]
    fn test_state_string() {
        assert_eq!(GestureState::Start.to_string(), "STATE_START");
        assert_eq!(GestureState::Invalid.to_string(), "STATE_INVALID");
    }
}
