//! Sprite animation clips cut from a tileset grid

use crate::config::AnimationConfig;
use ledge_math::Rect;

/// A sequence of source rectangles played at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub frames: Vec<Rect>,
    /// Milliseconds per frame
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationClip {
    /// Total play time of one pass
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_duration
    }
}

/// Named clips with one current clip
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    clips: Vec<AnimationClip>,
    current: usize,
    /// Milliseconds into the current clip
    elapsed: f32,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cut every configured clip from a grid of `columns` tiles per row
    pub fn from_config(config: &AnimationConfig) -> Self {
        let columns = config.columns.max(1);
        let mut set = Self::new();
        for clip in &config.clips {
            let frames = (clip.first_tile..clip.first_tile + clip.frame_count)
                .map(|tile| {
                    Rect::new(
                        (tile % columns) as i32 * config.tile_width,
                        (tile / columns) as i32 * config.tile_height,
                        config.tile_width,
                        config.tile_height,
                    )
                })
                .collect();
            set.add(AnimationClip {
                name: clip.name.clone(),
                frames,
                frame_duration: clip.frame_duration,
                looping: clip.looping,
            });
        }
        set
    }

    pub fn add(&mut self, clip: AnimationClip) {
        self.clips.push(clip);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Switch clips, restarting only when the clip actually changes
    pub fn set_current(&mut self, name: &str) -> bool {
        let Some(index) = self.clips.iter().position(|c| c.name == name) else {
            log::trace!("No animation named '{}'", name);
            return false;
        };
        if index != self.current {
            self.current = index;
            self.elapsed = 0.0;
        }
        true
    }

    pub fn current_name(&self) -> Option<&str> {
        self.clips.get(self.current).map(|c| c.name.as_str())
    }

    pub fn update(&mut self, dt: f32) {
        let Some(clip) = self.clips.get(self.current) else {
            return;
        };
        let duration = clip.duration();
        if duration <= 0.0 {
            return;
        }
        self.elapsed += dt;
        if clip.looping {
            self.elapsed %= duration;
        } else {
            self.elapsed = self.elapsed.min(duration);
        }
    }

    /// Source rectangle for the current frame
    pub fn current_frame(&self) -> Rect {
        let Some(clip) = self.clips.get(self.current) else {
            return Rect::default();
        };
        if clip.frames.is_empty() {
            return Rect::default();
        }
        let index = if clip.frame_duration > 0.0 {
            (self.elapsed / clip.frame_duration) as usize
        } else {
            0
        };
        clip.frames[index.min(clip.frames.len() - 1)]
    }
}
