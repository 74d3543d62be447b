//! cpal output transport
//!
//! ```text
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │     UI Thread    │───send()───────────►│   Command Queue     │
//! │                  │                     │ (crossbeam bounded) │
//! └──────────────────┘                     └──────────┬──────────┘
//!         │                                           │
//!         │ Relaxed atomics                           │ try_recv()
//!         ▼                                           ▼
//! ┌──────────────────┐                     ┌─────────────────────┐
//! │ PlaybackAtomics  │◄────────────────────│  cpal Audio Thread  │
//! │   (lock-free)    │     sync writes     │ (reads AudioSource) │
//! └──────────────────┘                     └─────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use crossbeam::channel::{self, Receiver, Sender};

use super::error::{PlaybackError, PlaybackResult};
use super::PlaybackTransport;
use crate::types::AudioSource;

/// Commands queued for the audio callback
#[derive(Debug, Clone, Copy)]
enum PlaybackCommand {
    /// Jump to a source frame
    Seek(u64),
    Play,
    Stop,
}

/// Lock-free state the audio thread publishes for the UI
pub struct PlaybackAtomics {
    /// Current playback position in source frames
    pub position: AtomicU64,
    pub playing: AtomicBool,
}

impl PlaybackAtomics {
    fn new() -> Self {
        Self {
            position: AtomicU64::new(0),
            playing: AtomicBool::new(false),
        }
    }

    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

/// Plays an [`AudioSource`] on the default output device
///
/// Drop this to close the stream.
pub struct CpalTransport {
    _stream: Stream,
    command_tx: Sender<PlaybackCommand>,
    atomics: Arc<PlaybackAtomics>,
    sample_rate: u32,
    frame_count: u64,
}

impl CpalTransport {
    pub fn open(source: Arc<AudioSource>) -> PlaybackResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::NoDevice("No default output device".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let stream_config = output_config(&device, source.sample_rate())?;
        log::info!(
            "CpalTransport: Using {} ({} channels, {}Hz)",
            device_name,
            stream_config.channels,
            stream_config.sample_rate.0
        );

        let atomics = Arc::new(PlaybackAtomics::new());
        let (command_tx, command_rx) = channel::bounded(64);
        let stream = build_stream(&device, &stream_config, source.clone(), command_rx, atomics.clone())?;
        stream
            .play()
            .map_err(|e| PlaybackError::StreamPlay(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            command_tx,
            atomics,
            sample_rate: source.sample_rate(),
            frame_count: source.frame_count() as u64,
        })
    }

    pub fn atomics(&self) -> Arc<PlaybackAtomics> {
        self.atomics.clone()
    }

    fn send(&self, cmd: PlaybackCommand) {
        if self.command_tx.try_send(cmd).is_err() {
            log::warn!("CpalTransport: Command queue full, dropped {:?}", cmd);
        }
    }
}

impl PlaybackTransport for CpalTransport {
    fn seek(&mut self, seconds: f64) {
        let frame = ((seconds.max(0.0) * self.sample_rate as f64) as u64).min(self.frame_count);
        // Publish right away so the UI does not read a stale position
        self.atomics.position.store(frame, Ordering::Relaxed);
        self.send(PlaybackCommand::Seek(frame));
    }

    fn play(&mut self) {
        self.atomics.playing.store(true, Ordering::Relaxed);
        self.send(PlaybackCommand::Play);
    }

    fn stop(&mut self) {
        self.atomics.playing.store(false, Ordering::Relaxed);
        self.send(PlaybackCommand::Stop);
    }

    fn is_playing(&self) -> bool {
        self.atomics.is_playing()
    }

    fn position(&self) -> f64 {
        self.atomics.position() as f64 / self.sample_rate as f64
    }
}

/// Prefer f32 at the source rate; otherwise the device default
fn output_config(device: &cpal::Device, sample_rate: u32) -> PlaybackResult<StreamConfig> {
    let supported: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| PlaybackError::Config(e.to_string()))?
        .collect();

    let exact = supported
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .find(|c| sample_rate >= c.min_sample_rate().0 && sample_rate <= c.max_sample_rate().0);

    let config = match exact {
        Some(c) => c.clone().with_sample_rate(cpal::SampleRate(sample_rate)),
        None => device
            .default_output_config()
            .map_err(|e| PlaybackError::Config(e.to_string()))?,
    };
    if config.sample_format() != SampleFormat::F32 {
        return Err(PlaybackError::Config(format!(
            "Unsupported sample format {:?}",
            config.sample_format()
        )));
    }
    Ok(config.config())
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    source: Arc<AudioSource>,
    command_rx: Receiver<PlaybackCommand>,
    atomics: Arc<PlaybackAtomics>,
) -> PlaybackResult<Stream> {
    let out_channels = config.channels as usize;
    let src_channels = source.channels() as usize;
    let frame_count = source.frame_count();
    // Source frames advanced per device frame
    let step = source.sample_rate() as f64 / config.sample_rate.0 as f64;

    let mut position = 0.0f64;
    let mut playing = false;

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = command_rx.try_recv() {
                    match cmd {
                        PlaybackCommand::Seek(frame) => position = frame as f64,
                        PlaybackCommand::Play => playing = true,
                        PlaybackCommand::Stop => playing = false,
                    }
                }

                let samples = source.samples();
                for frame in data.chunks_mut(out_channels) {
                    let index = position as usize;
                    if !playing || index >= frame_count {
                        playing = playing && index < frame_count;
                        frame.fill(0.0);
                        continue;
                    }

                    let src = &samples[index * src_channels..(index + 1) * src_channels];
                    match (src_channels, out_channels) {
                        (1, _) => frame.fill(src[0]),
                        (_, 1) => frame[0] = source.mono()[index],
                        _ => {
                            frame[0] = src[0];
                            frame[1] = src[1];
                            for ch in frame.iter_mut().skip(2) {
                                *ch = 0.0;
                            }
                        }
                    }
                    position += step;
                }

                atomics
                    .position
                    .store((position as u64).min(frame_count as u64), Ordering::Relaxed);
                atomics.playing.store(playing, Ordering::Relaxed);
            },
            move |err| {
                log::error!("CpalTransport: Stream error: {}", err);
            },
            None,
        )
        .map_err(|e| PlaybackError::StreamBuild(e.to_string()))
}
