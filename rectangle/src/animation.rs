use std::time::Duration;

use crate::color::Rgb;
use crate::math::Lerpable;
use crate::vertex::VERTEX_COUNT;

/// Number of steps a color transition takes.
pub const FRAME_LIMIT: u32 = 120;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Transitioning,
}

/// Per-vertex color transition, blended in HSV space one step at a time.
#[derive(Debug, Clone)]
pub struct ColorAnimation {
    from: [Rgb; VERTEX_COUNT],
    to: [Rgb; VERTEX_COUNT],
    frame_count: u32,
    elapsed: Duration,
}

impl ColorAnimation {
    /// An idle animation resting on `colors`.
    pub fn new(colors: [Rgb; VERTEX_COUNT]) -> Self {
        Self {
            from: colors,
            to: colors,
            frame_count: FRAME_LIMIT + 1,
            elapsed: Duration::ZERO,
        }
    }

    /// Begins a transition from `current` to `target`, discarding any transition in progress.
    pub fn start(&mut self, current: [Rgb; VERTEX_COUNT], target: [Rgb; VERTEX_COUNT]) {
        self.from = current;
        self.to = target;
        self.frame_count = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Advances by one step and returns the blended colors, or `None` when idle.
    ///
    /// The step that moves past [`FRAME_LIMIT`] produces no colors; the colors of the
    /// previous step already equal the target.
    pub fn advance(&mut self) -> Option<[Rgb; VERTEX_COUNT]> {
        if self.frame_count > FRAME_LIMIT {
            return None;
        }

        self.frame_count += 1;

        if self.frame_count > FRAME_LIMIT {
            log::debug!("Color transition finished after {:?}", self.elapsed);
            return None;
        }

        let alpha = self.frame_count as f64 / FRAME_LIMIT as f64;

        let mut colors = self.to;

        for (color, from) in colors.iter_mut().zip(&self.from) {
            *color = from.to_hsv().lerp(&color.to_hsv(), alpha).to_rgb();
        }

        Some(colors)
    }

    /// Adds host frame time to the running transition.
    pub fn record_elapsed(&mut self, delta: Duration) {
        if self.state() == AnimationState::Transitioning {
            self.elapsed += delta;
        }
    }

    pub fn state(&self) -> AnimationState {
        if self.frame_count > FRAME_LIMIT {
            AnimationState::Idle
        } else {
            AnimationState::Transitioning
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn from_colors(&self) -> &[Rgb; VERTEX_COUNT] {
        &self.from
    }

    pub fn target_colors(&self) -> &[Rgb; VERTEX_COUNT] {
        &self.to
    }
}
