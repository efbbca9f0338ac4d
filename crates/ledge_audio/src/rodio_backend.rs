//! Device-backed audio using rodio

use crate::error::{AudioError, Result};
use crate::service::{clamp_volume, AudioService, EffectId};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::sync::Arc;

/// Audio service playing through the default output device
///
/// Effects are decoded from memory on every play so the same effect can
/// overlap itself.
pub struct RodioAudio {
    /// Output stream (must be kept alive)
    _stream: OutputStream,
    /// Stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Encoded effect data; `EffectId(n)` lives at `n - 1`
    effects: Vec<Arc<[u8]>>,
    /// Sinks of effects that may still be playing
    effect_sinks: Vec<Sink>,
    music_sink: Option<Sink>,
    music_volume: f32,
    fx_volume: f32,
}

impl RodioAudio {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        log::info!("Audio device opened");

        Ok(Self {
            _stream: stream,
            stream_handle,
            effects: Vec::new(),
            effect_sinks: Vec::new(),
            music_sink: None,
            music_volume: 1.0,
            fx_volume: 1.0,
        })
    }

    fn read_effect(path: &str) -> Result<Arc<[u8]>> {
        let bytes = std::fs::read(path).map_err(|e| AudioError::FileNotFound {
            path: path.to_string(),
            source: e,
        })?;
        let data: Arc<[u8]> = bytes.into();

        // Reject undecodable data at load time rather than on first play
        Decoder::new(Cursor::new(Arc::clone(&data))).map_err(|e| AudioError::LoadError {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(data)
    }

    fn try_play_effect(&mut self, data: Arc<[u8]>, volume: f32) -> Result<()> {
        let source = Decoder::new(Cursor::new(data)).map_err(|e| AudioError::LoadError {
            path: String::from("<effect>"),
            reason: e.to_string(),
        })?;
        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        sink.set_volume(volume * self.fx_volume);
        sink.append(source);
        self.effect_sinks.push(sink);
        Ok(())
    }
}

impl AudioService for RodioAudio {
    fn load_effect(&mut self, path: &str) -> EffectId {
        if path.is_empty() {
            return EffectId::UNSET;
        }

        match Self::read_effect(path) {
            Ok(data) => {
                self.effects.push(data);
                let id = EffectId(self.effects.len() as u32);
                log::debug!("Loaded effect {} from {}", id, path);
                id
            }
            Err(e) => {
                log::warn!("{}", e);
                EffectId::UNSET
            }
        }
    }

    fn play_effect(&mut self, id: EffectId, volume: Option<f32>) {
        if id.is_unset() {
            return;
        }
        let Some(data) = self.effects.get(id.0 as usize - 1).cloned() else {
            log::warn!("Unknown effect {}", id);
            return;
        };

        // Drop finished sinks
        self.effect_sinks.retain(|s| !s.empty());

        let volume = clamp_volume(volume.unwrap_or(1.0));
        if let Err(e) = self.try_play_effect(data, volume) {
            log::warn!("Failed to play {}: {}", id, e);
        }
    }

    fn stop_all_effects(&mut self) {
        for sink in self.effect_sinks.drain(..) {
            sink.stop();
        }
    }

    fn play_music(&mut self, path: &str) -> Result<()> {
        // Stop current music
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }

        let file = File::open(path).map_err(|e| AudioError::FileNotFound {
            path: path.to_string(),
            source: e,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::LoadError {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        sink.set_volume(self.music_volume);
        sink.append(source.repeat_infinite());

        self.music_sink = Some(sink);
        log::info!("Playing music {}", path);
        Ok(())
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
        if let Some(ref sink) = self.music_sink {
            sink.set_volume(self.music_volume);
        }
    }

    fn set_fx_volume(&mut self, volume: f32) {
        self.fx_volume = clamp_volume(volume);
    }

    fn music_volume(&self) -> f32 {
        self.music_volume
    }

    fn fx_volume(&self) -> f32 {
        self.fx_volume
    }
}
