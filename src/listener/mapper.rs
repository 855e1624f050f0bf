//! hand position to light intensity

use glam::Vec3;
use crate::sensor::entity::Hand;

/// averaged fingertip of the first hand
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandSample {
    pub finger_count: usize,
    pub average_tip_position: Vec3,
}

impl HandSample {
    /// `None` when the hand has no fingers
    pub fn from_hand(hand: &Hand) -> Option<Self> {
        if hand.fingers.is_empty() {
            return None;
        }
        let sum: Vec3 = hand.fingers.iter().map(|finger| finger.tip_position).sum();
        Some(HandSample {
            finger_count: hand.fingers.len(),
            average_tip_position: sum / hand.fingers.len() as f32,
        })
    }
}

/// raw, unclamped intensities for the two lights
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Intensity {
    pub light_0: i32,
    pub light_1: i32,
}

/// hand left dims light_1 and brightens light_0, hand right the opposite
pub fn map_intensity(x: f32) -> Intensity {
    let x = x.trunc() as i32;
    Intensity {
        light_0: 100i32.saturating_sub(x).saturating_abs(),
        light_1: 100i32.saturating_add(x).saturating_abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::entity::Finger;

    fn finger(id: i32, x: f32) -> Finger {
        Finger { id, tip_position: Vec3::new(x, 150.0, -20.0), direction: Vec3::ZERO }
    }

    fn hand(fingers: Vec<Finger>) -> Hand {
        Hand {
            id: 1,
            palm_position: Vec3::ZERO,
            palm_normal: Vec3::ZERO,
            direction: Vec3::ZERO,
            sphere_radius: 0.0,
            fingers,
        }
    }

    #[test]
    fn test_map_reference_points() {
        assert_eq!(map_intensity(0.0), Intensity { light_0: 100, light_1: 100 });
        assert_eq!(map_intensity(50.0), Intensity { light_0: 50, light_1: 150 });
        assert_eq!(map_intensity(-50.0), Intensity { light_0: 150, light_1: 50 });
        assert_eq!(map_intensity(100.0), Intensity { light_0: 0, light_1: 200 });
    }

    #[test]
    fn test_map_truncates_toward_zero() {
        assert_eq!(map_intensity(20.9), Intensity { light_0: 80, light_1: 120 });
        assert_eq!(map_intensity(-20.9), Intensity { light_0: 120, light_1: 80 });
    }

    #[test]
    fn test_map_far_out() {
        // past the channel range, clamping happens on the fixture
        assert_eq!(map_intensity(400.0), Intensity { light_0: 300, light_1: 500 });
        assert_eq!(map_intensity(f32::NEG_INFINITY).light_0, i32::MAX);
        assert_eq!(map_intensity(f32::NAN), Intensity { light_0: 100, light_1: 100 });
    }

    #[test]
    fn test_hand_sample() {
        let sample = HandSample::from_hand(&hand(vec![finger(1, 10.0), finger(2, 30.0)])).unwrap();
        assert_eq!(sample.finger_count, 2);
        assert_eq!(sample.average_tip_position, Vec3::new(20.0, 150.0, -20.0));
        assert!(HandSample::from_hand(&hand(Vec::new())).is_none());
    }
}
