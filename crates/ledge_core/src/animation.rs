//! Frame-based sprite animation types and deterministic tick logic.
//!
//! Clips are sequences of sprite frames with per-frame durations. Timing is
//! kept in integer microseconds (`u64`) so advancement under the fixed
//! timestep is identical across runs; callers pass milliseconds and the
//! conversion happens once at the boundary.
//!
//! [`AnimationController`] owns a set of named clips and one active
//! [`AnimationState`]. Switching clips resets the new clip to its first frame.

use std::collections::HashMap;

/// A single frame in an animation clip.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub sprite_id: String,
    pub duration_us: u64,
}

/// A named sequence of frames that can loop or play once.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl AnimationClip {
    /// Build a clip whose frames all share one duration.
    pub fn uniform(sprite_ids: &[&str], frame_ms: u64, looping: bool) -> Self {
        Self {
            frames: sprite_ids
                .iter()
                .map(|id| AnimationFrame {
                    sprite_id: (*id).to_string(),
                    duration_us: frame_ms * 1000,
                })
                .collect(),
            looping,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_us).sum()
    }
}

/// Runtime state for one active animation instance.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed_us = 0;
        self.finished = false;
    }

    /// Advance the animation by `dt_us` microseconds. Returns the current frame's
    /// `sprite_id`.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> &'a str {
        if clip.frames.is_empty() || self.finished {
            return if let Some(frame) = clip.frames.get(self.frame_index) {
                &frame.sprite_id
            } else if let Some(frame) = clip.frames.last() {
                &frame.sprite_id
            } else {
                ""
            };
        }

        self.elapsed_us += dt_us;

        loop {
            let current_frame = &clip.frames[self.frame_index];
            if self.elapsed_us < current_frame.duration_us || current_frame.duration_us == 0 {
                break;
            }

            self.elapsed_us -= current_frame.duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        &clip.frames[self.frame_index].sprite_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    clips: HashMap<String, AnimationClip>,
    current: Option<AnimationState>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_clip(&mut self, name: &str, clip: AnimationClip) {
        self.clips.insert(name.to_string(), clip);
    }

    /// Switch to `name`. Replaying the active clip keeps its progress; unknown
    /// names are ignored.
    pub fn play(&mut self, name: &str) {
        if !self.clips.contains_key(name) {
            log::trace!("Ignoring play request for unknown clip '{}'", name);
            return;
        }
        if self.current_name() == Some(name) {
            return;
        }
        self.current = Some(AnimationState::new(name));
    }

    pub fn tick_ms(&mut self, dt_ms: f32) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        let Some(clip) = self.clips.get(&state.clip_name) else {
            return;
        };
        let dt_us = (dt_ms.max(0.0) * 1000.0).round() as u64;
        state.tick(dt_us, clip);
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.clip_name.as_str())
    }

    /// Sprite id of the active frame, or `None` when nothing is playing.
    pub fn current_sprite(&self) -> Option<&str> {
        let state = self.current.as_ref()?;
        let clip = self.clips.get(&state.clip_name)?;
        clip.frames
            .get(state.frame_index)
            .map(|f| f.sprite_id.as_str())
    }
}
