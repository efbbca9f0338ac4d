//! Engine: the ordered frame pipeline
//!
//! ```text
//! awake ─► start ─► ┌─────────────── run_frame ───────────────┐ ─► clean_up
//!                   │ pre_update ─► update ─► post_update     │
//!                   │ (input,       (controller,  (sync,      │
//!                   │  debug keys)   physics)      stats)     │
//!                   └─────────────────────────────────────────┘
//! ```

use crate::config::GameConfig;
use crate::level::{Level, LevelError, LevelMap};
use crate::textures::{TextureHandle, TextureService};
use ledge_audio::AudioService;
use ledge_input::{InputService, Key};
use ledge_math::Vec2;
use ledge_player::{ConfigError, PlayerConfig};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("Engine used before start()")]
    NotStarted,

    #[error("Failed to write trace {path}: {source}")]
    Trace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Trace encoding error: {0}")]
    TraceEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Frame timing over simulated time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub frame_count: u64,
    /// Milliseconds since the first frame
    pub elapsed_ms: f64,
    pub last_dt: f32,
    /// Frames counted in the last full second
    pub frames_per_second: u32,
    pub average_fps: f32,
    second_frames: u32,
    second_ms: f64,
}

impl FrameStats {
    /// Count a frame; true when a second boundary was crossed
    pub fn record(&mut self, dt: f32) -> bool {
        self.frame_count += 1;
        self.last_dt = dt;
        self.elapsed_ms += dt as f64;
        self.second_frames += 1;
        self.second_ms += dt as f64;

        if self.second_ms < 1000.0 {
            return false;
        }
        self.frames_per_second = self.second_frames;
        self.average_fps = if self.average_fps == 0.0 {
            self.frames_per_second as f32
        } else {
            (self.average_fps + self.frames_per_second as f32) / 2.0
        };
        self.second_frames = 0;
        self.second_ms -= 1000.0;
        true
    }
}

/// Player snapshot written to the trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub time_ms: f64,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub camera: [i32; 2],
    pub grounded: bool,
    pub dashing: bool,
    pub dead: bool,
    pub god_mode: bool,
    pub checkpoint: Option<String>,
}

/// What happened during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub items_collected: usize,
    pub deaths: u32,
    pub final_position: [f32; 2],
    pub checkpoint: Option<String>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} items, {} deaths, final position ({:.0}, {:.0}), checkpoint {}",
            self.frames,
            self.items_collected,
            self.deaths,
            self.final_position[0],
            self.final_position[1],
            self.checkpoint.as_deref().unwrap_or("none")
        )
    }
}

/// Frame rate while the F11 cap is on
pub const CAPPED_FRAME_RATE: u32 = 30;

pub struct Engine {
    config: GameConfig,
    input: Box<dyn InputService>,
    audio: Box<dyn AudioService>,
    textures: TextureService,
    level: Option<Level>,
    player_texture: Option<TextureHandle>,
    stats: FrameStats,
    show_help: bool,
    frame_cap: bool,
    quit: bool,
    deaths: u32,
    was_dead: bool,
    trace: Option<Vec<FrameSample>>,
}

impl Engine {
    pub fn new(
        config: GameConfig,
        input: Box<dyn InputService>,
        audio: Box<dyn AudioService>,
    ) -> Self {
        Self {
            config,
            input,
            audio,
            textures: TextureService::new(),
            level: None,
            player_texture: None,
            stats: FrameStats::default(),
            show_help: false,
            frame_cap: false,
            quit: false,
            deaths: 0,
            was_dead: false,
            trace: None,
        }
    }

    // ==================== Lifecycle ====================

    /// Configure services before anything is loaded
    pub fn awake(&mut self) -> Result<()> {
        log::info!(
            "{} awake: {} fps, viewport {}x{}",
            self.config.engine.title,
            self.config.engine.target_frame_rate,
            self.config.viewport.width,
            self.config.viewport.height
        );

        self.audio.set_music_volume(self.config.audio.music_volume);
        self.audio.set_fx_volume(self.config.audio.fx_volume);

        if self.config.trace_path.is_some() {
            self.trace = Some(Vec::new());
        }
        Ok(())
    }

    /// Load the player, the map and their assets, and build the level
    pub fn start(&mut self) -> Result<()> {
        let player_config = match self.config.resolve(&self.config.paths.player) {
            Some(path) => PlayerConfig::load_or_default(path),
            None => PlayerConfig::default(),
        };
        let map = match self.config.resolve(&self.config.paths.map) {
            Some(path) => LevelMap::load_or_default(path),
            None => LevelMap::default(),
        };

        if let Some(path) = self.config.resolve(&player_config.texture.path) {
            self.player_texture = self.load_texture(&path);
        }

        let mut level = Level::new(
            map,
            player_config,
            self.config.physics.clone(),
            self.audio.as_mut(),
        )?;
        level
            .player_mut()
            .set_viewport(self.config.viewport.width, self.config.viewport.height);
        self.level = Some(level);

        if let Some(music) = self.config.resolve(&self.config.audio.music) {
            if let Err(e) = self.audio.play_music(&music.to_string_lossy()) {
                log::warn!("Music disabled: {}", e);
            }
        }
        Ok(())
    }

    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        match self.textures.load_texture(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    /// Run one frame; false once a quit was requested
    pub fn run_frame(&mut self, dt: f32) -> Result<bool> {
        self.pre_update()?;
        if self.quit {
            return Ok(false);
        }
        self.update(dt)?;
        self.post_update(dt)?;
        Ok(true)
    }

    /// Run the configured number of frames at the current frame delta
    ///
    /// With `frames = 0` the run lasts until the input source is finished.
    pub fn run(&mut self) -> Result<RunSummary> {
        let frames = self.config.engine.frames;

        loop {
            if frames > 0 && self.stats.frame_count >= frames {
                break;
            }
            if frames == 0 && self.input.is_finished() {
                break;
            }
            if !self.run_frame(self.frame_delta())? {
                log::info!("Quit requested");
                break;
            }
        }

        let summary = self.summary()?;
        log::info!("Run finished: {}", summary);
        Ok(summary)
    }

    /// Release the level and every loaded resource, then write the trace
    pub fn clean_up(&mut self) -> Result<()> {
        if let Some(level) = self.level.as_mut() {
            level.clean_up();
        }
        self.level = None;
        self.audio.stop_all_effects();
        if let Some(handle) = self.player_texture.take() {
            self.textures.unload_texture(handle);
        }
        self.textures.clear();

        if let (Some(path), Some(samples)) = (self.config.trace_path(), self.trace.as_ref()) {
            write_trace(&path, samples)?;
            log::info!("Wrote {} trace samples to {}", samples.len(), path.display());
        }
        Ok(())
    }

    // ==================== Phases ====================

    fn pre_update(&mut self) -> Result<()> {
        self.input.poll();

        if self.input.is_down(Key::Escape) {
            self.quit = true;
        }

        if self.input.is_down(Key::H) {
            self.show_help = !self.show_help;
            if self.show_help {
                self.log_help()?;
            } else {
                log::info!("Debug help: hidden");
            }
        }

        if self.input.is_down(Key::F10) {
            let player = self.level_mut()?.player_mut();
            let enabled = !player.god_mode();
            player.set_god_mode(enabled);
        }

        if self.input.is_down(Key::F11) {
            self.frame_cap = !self.frame_cap;
            log::info!(
                "FPS cap: {} ({} fps)",
                if self.frame_cap { "ON" } else { "OFF" },
                self.frame_rate()
            );
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        let level = self.level.as_mut().ok_or(EngineError::NotStarted)?;
        level.update(self.input.as_ref(), self.audio.as_mut(), dt)?;
        level.step(self.audio.as_mut(), dt)?;
        Ok(())
    }

    fn post_update(&mut self, dt: f32) -> Result<()> {
        let level = self.level.as_mut().ok_or(EngineError::NotStarted)?;
        level.post_update(dt)?;

        let dead = level.player().is_dead();
        if dead && !self.was_dead {
            self.deaths += 1;
        }
        self.was_dead = dead;

        if self.stats.record(dt) {
            log::debug!(
                "{} | FPS: {} / Avg.FPS: {:.2} / Last-frame MS: {:.2}",
                self.config.engine.title,
                self.stats.frames_per_second,
                self.stats.average_fps,
                self.stats.last_dt
            );
        }

        if self.trace.is_some() {
            let sample = self.sample()?;
            if let Some(trace) = self.trace.as_mut() {
                trace.push(sample);
            }
        }
        Ok(())
    }

    fn log_help(&self) -> Result<()> {
        let god = self.level()?.player().god_mode();
        log::info!("=== DEBUG HELP ===");
        log::info!("H     - Toggle this help");
        log::info!("F10   - God mode [{}]", if god { "ON" } else { "OFF" });
        log::info!("F11   - Toggle FPS cap [{}]", self.frame_rate());
        log::info!("WASD  - Move (W/S fly in god mode)");
        log::info!("SPACE - Jump, again in the air to double jump");
        log::info!("SHIFT - Dash");
        log::info!("T     - Teleport");
        log::info!("ESC   - Exit");
        log::info!("==================");
        Ok(())
    }

    fn sample(&self) -> Result<FrameSample> {
        let player = self.level()?.player();
        let position = player.position();
        let velocity = player.velocity();
        let view = player.camera().view;
        Ok(FrameSample {
            frame: self.stats.frame_count,
            time_ms: self.stats.elapsed_ms,
            position: position.to_array(),
            velocity: velocity.to_array(),
            camera: [view.x, view.y],
            grounded: player.state().is_grounded(),
            dashing: player.state().is_dashing(),
            dead: player.is_dead(),
            god_mode: player.god_mode(),
            checkpoint: player.current_checkpoint().map(str::to_string),
        })
    }

    pub fn summary(&self) -> Result<RunSummary> {
        let level = self.level()?;
        let position: Vec2 = level.player().position();
        Ok(RunSummary {
            frames: self.stats.frame_count,
            items_collected: level.items_collected(),
            deaths: self.deaths,
            final_position: position.to_array(),
            checkpoint: level.player().current_checkpoint().map(str::to_string),
        })
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> Result<&Level> {
        self.level.as_ref().ok_or(EngineError::NotStarted)
    }

    pub fn level_mut(&mut self) -> Result<&mut Level> {
        self.level.as_mut().ok_or(EngineError::NotStarted)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn audio(&self) -> &dyn AudioService {
        self.audio.as_ref()
    }

    pub fn textures(&self) -> &TextureService {
        &self.textures
    }

    pub fn player_texture(&self) -> Option<TextureHandle> {
        self.player_texture
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn frame_cap(&self) -> bool {
        self.frame_cap
    }

    /// Frames per second the run advances at
    pub fn frame_rate(&self) -> u32 {
        let rate = self.config.frame_rate();
        if self.frame_cap {
            rate.min(CAPPED_FRAME_RATE)
        } else {
            rate
        }
    }

    /// Milliseconds simulated per frame
    pub fn frame_delta(&self) -> f32 {
        1000.0 / self.frame_rate() as f32
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn trace(&self) -> Option<&[FrameSample]> {
        self.trace.as_deref()
    }
}

fn write_trace(path: &Path, samples: &[FrameSample]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| EngineError::Trace {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), samples)?;
    Ok(())
}
