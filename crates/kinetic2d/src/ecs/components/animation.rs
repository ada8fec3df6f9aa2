//! Sprite animation state
//!
//! Only the frame counter matters to the core: melee hits are gated on the
//! attacker's current frame and destructible props advance one frame per hit.

use crate::ecs::Component;
use serde::{Deserialize, Serialize};

/// Frame-based animation component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Frame currently shown
    pub current_frame: u32,

    /// Number of frames in the strip
    pub frame_count: u32,

    /// Seconds each frame stays on screen
    pub frame_duration: f32,

    /// Wrap to frame 0 after the last frame
    pub looping: bool,

    /// Advance automatically in [`Animation::tick`]
    pub playing: bool,

    elapsed: f32,
}

impl Component for Animation {}

impl Animation {
    /// Create a stopped, looping animation
    pub fn new(frame_count: u32, frame_duration: f32) -> Self {
        Self {
            current_frame: 0,
            frame_count: frame_count.max(1),
            frame_duration,
            looping: true,
            playing: false,
            elapsed: 0.0,
        }
    }

    /// Builder: stop on the last frame instead of wrapping
    #[must_use]
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Index of the last frame
    ///
    /// A strip with no frames reports frame 0.
    pub const fn last_frame(&self) -> u32 {
        self.frame_count.saturating_sub(1)
    }

    /// True when a non-looping animation sits on its last frame
    pub const fn is_finished(&self) -> bool {
        !self.looping && self.current_frame == self.last_frame()
    }

    /// Restart from frame 0 and begin playing
    pub fn play(&mut self) {
        self.current_frame = 0;
        self.elapsed = 0.0;
        self.playing = true;
    }

    /// Stop and return to frame 0
    pub fn stop(&mut self) {
        self.current_frame = 0;
        self.elapsed = 0.0;
        self.playing = false;
    }

    /// Advance by `dt` seconds while playing
    pub fn tick(&mut self, dt: f32) {
        if !self.playing || self.frame_duration <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frame_duration && self.playing {
            self.elapsed -= self.frame_duration;
            self.step_frame();
        }
    }

    /// Move to the next frame
    ///
    /// Non-looping animations stop on their last frame.
    pub fn step_frame(&mut self) {
        if self.current_frame + 1 < self.frame_count {
            self.current_frame += 1;
        } else if self.looping {
            self.current_frame = 0;
        } else {
            self.playing = false;
        }
    }
}
