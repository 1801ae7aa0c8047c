//! Horizontal swipe recognition for single-finger drags.
//!
//! A drag latches as a swipe once it has travelled further horizontally than
//! vertically and past `latch_distance`. On release, a latched drag longer
//! than `release_threshold` becomes a swipe; everything else is left to the
//! viewport's own scroll/pan handling. Distances are device-independent
//! units (egui points).

use crate::viewer::Command;

pub const DEFAULT_LATCH_DISTANCE: f32 = 50.0;
pub const DEFAULT_RELEASE_THRESHOLD: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    pub latch_distance: f32,
    pub release_threshold: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            latch_distance: DEFAULT_LATCH_DISTANCE,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    None,
    /// Finger moved right to left.
    Left,
    /// Finger moved left to right.
    Right,
}

impl Swipe {
    /// Right goes back, left goes forward.
    pub fn command(self) -> Option<Command> {
        match self {
            Swipe::None => None,
            Swipe::Left => Some(Command::Next),
            Swipe::Right => Some(Command::Prev),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    start: Option<(f32, f32)>,
    is_swiping: bool,
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            start: None,
            is_swiping: false,
        }
    }

    pub fn down(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
        self.is_swiping = false;
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        let Some((sx, sy)) = self.start else {
            return;
        };
        let dx = (x - sx).abs();
        let dy = (y - sy).abs();
        if dx > dy && dx > self.config.latch_distance {
            self.is_swiping = true;
        }
    }

    pub fn up(&mut self, x: f32, _y: f32) -> Swipe {
        let Some((sx, _)) = self.start.take() else {
            return Swipe::None;
        };
        let swiping = std::mem::replace(&mut self.is_swiping, false);
        let diff = x - sx;
        if !swiping || diff.abs() <= self.config.release_threshold {
            return Swipe::None;
        }
        if diff > 0.0 { Swipe::Right } else { Swipe::Left }
    }

    /// Abandon the current gesture, e.g. when a second finger lands.
    pub fn cancel(&mut self) {
        self.start = None;
        self.is_swiping = false;
    }
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}
