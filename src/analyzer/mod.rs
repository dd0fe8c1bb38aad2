mod motion;

pub use motion::{DetectionState, MotionDetector, MotionReport};
