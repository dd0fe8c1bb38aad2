use crate::config::DetectorConfig;
use crate::error::DetectorError;
use crate::frame::{Frame, GrayFrame};

use image::{ImageBuffer, Luma};
use imageproc::{
    contrast::threshold,
    region_labelling::{connected_components, Connectivity},
};
use std::collections::HashMap;
use tracing::{debug, info, trace};

/// Detector state: one grayscale baseline plus the two thresholds
#[derive(Debug, Clone)]
pub struct DetectionState {
    pub previous_frame: Option<GrayFrame>,
    pub motion_threshold: u8,
    pub min_region_area: u32,
}

/// Outcome of comparing a frame against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionReport {
    pub motion: bool,
    /// Pixel count of the largest changed region
    pub largest_region: u32,
}

/// Frame-differencing motion detector with a single-frame sliding baseline
pub struct MotionDetector {
    state: DetectionState,
    frames_compared: u64,
}

impl MotionDetector {
    pub fn new(motion_threshold: u8, min_region_area: u32) -> Self {
        Self {
            state: DetectionState {
                previous_frame: None,
                motion_threshold,
                min_region_area,
            },
            frames_compared: 0,
        }
    }

    /// Create a detector from validated configuration
    pub fn from_config(config: &DetectorConfig) -> Self {
        let motion_threshold = config.motion_threshold.min(u8::MAX as u32) as u8;
        info!(
            "Initializing motion detector (threshold {}, minimum region {} px)",
            motion_threshold, config.min_region_area
        );
        Self::new(motion_threshold, config.min_region_area)
    }

    /// Returns true when the frame differs from the previous one by a region
    /// larger than the minimum area.
    pub fn detect_motion(&mut self, frame: &Frame) -> Result<bool, DetectorError> {
        self.analyze(frame).map(|report| report.motion)
    }

    /// Compare the frame against the baseline and slide the baseline forward
    pub fn analyze(&mut self, frame: &Frame) -> Result<MotionReport, DetectorError> {
        if frame.is_empty() {
            return Err(DetectorError::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }

        let current = frame.to_gray();

        let Some(previous) = self.state.previous_frame.as_ref() else {
            debug!("Storing frame {} as motion baseline", frame.id);
            self.state.previous_frame = Some(current);
            return Ok(MotionReport {
                motion: false,
                largest_region: 0,
            });
        };

        if previous.dimensions() != current.dimensions() {
            return Err(DetectorError::DimensionMismatch {
                expected: previous.dimensions(),
                actual: current.dimensions(),
            });
        }

        let diff = absolute_difference(previous, &current);
        let mask = threshold(&diff, self.state.motion_threshold);
        let components = connected_components(&mask, Connectivity::Eight, Luma([0u8]));
        let largest_region = largest_component_area(&components);

        self.state.previous_frame = Some(current);
        self.frames_compared += 1;

        let motion = largest_region > self.state.min_region_area;
        trace!(
            "Frame {}: largest changed region {} px (minimum {})",
            frame.id,
            largest_region,
            self.state.min_region_area
        );

        Ok(MotionReport {
            motion,
            largest_region,
        })
    }

    pub fn has_baseline(&self) -> bool {
        self.state.previous_frame.is_some()
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// Number of frames compared against a baseline
    pub fn frames_compared(&self) -> u64 {
        self.frames_compared
    }
}

fn absolute_difference(previous: &GrayFrame, current: &GrayFrame) -> GrayFrame {
    let (width, height) = previous.dimensions();
    let mut diff = GrayFrame::new(width, height);

    for ((out, prev), curr) in diff
        .pixels_mut()
        .zip(previous.pixels())
        .zip(current.pixels())
    {
        out[0] = prev[0].abs_diff(curr[0]);
    }

    diff
}

fn largest_component_area(components: &ImageBuffer<Luma<u32>, Vec<u32>>) -> u32 {
    let mut component_counts: HashMap<u32, u32> = HashMap::new();

    for pixel in components.pixels() {
        let label = pixel[0];
        if label > 0 {
            *component_counts.entry(label).or_insert(0) += 1;
        }
    }

    component_counts.values().max().copied().unwrap_or(0)
}
