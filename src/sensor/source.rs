//! frame sources for the sensor host
//! - ReplaySource: json lines 录制文件，每行一帧
//! - SweepSource: 合成一只左右摆动的手，没有录制文件时使用

use std::f32::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;
use crate::common::error::DriverError;
use crate::{info, warn};
use glam::Vec3;
use super::entity::{Finger, Frame, Hand};
use super::traits::FrameSource;

const LOG_TAG: &str = "source.rs | frame source";

pub struct ReplaySource {
    frames: Vec<Frame>,
    cursor: usize,
    looping: bool,
    next_id: i64,
}

impl ReplaySource {
    pub fn open(file_path: &str, looping: bool) -> Result<Self, DriverError> {
        let file = File::open(file_path)
            .map_err(|e| DriverError::SensorSource(format!("cannot open recording {}: {}", file_path, e)))?;
        let source = Self::from_reader(BufReader::new(file), looping)?;
        info!(LOG_TAG, "recording loaded: {}, frames: {}, looping: {}", file_path, source.len(), looping);
        Ok(source)
    }

    /// one json frame per line, blank and malformed lines are skipped
    pub fn from_reader<R: BufRead>(reader: R, looping: bool) -> Result<Self, DriverError> {
        let mut frames = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| DriverError::SensorSource(format!("cannot read recording: {}", e)))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Frame>(line) {
                Ok(frame) => frames.push(frame),
                Err(e) => warn!(LOG_TAG, "recording line {} skipped: {}", line_no + 1, e),
            }
        }
        let next_id = frames.iter().map(|f| f.id).max().map(|id| id + 1).unwrap_or(0);
        Ok(ReplaySource { frames, cursor: 0, looping, next_id })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, DriverError> {
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Ok(None);
            }
            self.cursor = 0;
        }
        let mut frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        if self.looping {
            // keep ids increasing across rounds
            frame.id = self.next_id;
            self.next_id += 1;
        }
        Ok(Some(frame))
    }
}

/// synthetic hand moving x = amplitude * sin(2πt / period)
pub struct SweepSource {
    amplitude: f32,
    period: Duration,
    frame_interval: Duration,
    frame_id: i64,
}

impl SweepSource {
    pub fn new(amplitude: f32, period: Duration, frame_interval: Duration) -> Self {
        info!(LOG_TAG, "no recording configured, sweeping a synthetic hand, amplitude: {} mm", amplitude);
        SweepSource { amplitude, period, frame_interval, frame_id: 0 }
    }

    fn hand_at(&self, x: f32) -> Hand {
        let palm = Vec3::new(x, 200.0, 0.0);
        Hand {
            id: 1,
            palm_position: palm,
            palm_normal: Vec3::new(0.0, -1.0, 0.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            sphere_radius: 80.0,
            fingers: vec![
                Finger { id: 10, tip_position: palm + Vec3::new(-15.0, 10.0, -60.0), direction: Vec3::new(0.0, 0.0, -1.0) },
                Finger { id: 11, tip_position: palm + Vec3::new(15.0, 10.0, -60.0), direction: Vec3::new(0.0, 0.0, -1.0) },
            ],
        }
    }
}

impl FrameSource for SweepSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, DriverError> {
        let elapsed_secs = self.frame_interval.as_secs_f64() * self.frame_id as f64;
        let period = self.period.as_secs_f64().max(f64::EPSILON);
        // only the position inside the current turn matters
        let turn = (elapsed_secs / period).fract();
        let x = self.amplitude * (2.0 * PI * turn as f32).sin();
        let frame = Frame {
            id: self.frame_id,
            timestamp: (self.frame_interval.as_micros() as i64).saturating_mul(self.frame_id),
            hands: vec![self.hand_at(x)],
            gestures: Vec::new(),
        };
        self.frame_id += 1;
        Ok(Some(frame))
    }
}
