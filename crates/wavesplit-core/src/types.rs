//! Core types shared across the engine

use std::ops::Range;

/// Decoded PCM audio for one editing session
///
/// Samples are interleaved f32 frames. The buffer is fixed once loaded, so
/// the duration never changes during a session; share it behind an `Arc`
/// with the renderer and the exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    samples: Vec<f32>,
    mono: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSource {
    /// Build a source from interleaved samples
    ///
    /// A trailing partial frame is dropped. Zero sample rate or channel
    /// count are bumped to 1 so derived quantities stay finite.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let sample_rate = sample_rate.max(1);
        let channels = channels.max(1);
        let ch = channels as usize;
        samples.truncate(samples.len() - samples.len() % ch);

        let mono = if ch == 1 {
            samples.clone()
        } else {
            samples
                .chunks_exact(ch)
                .map(|frame| frame.iter().sum::<f32>() / ch as f32)
                .collect()
        };

        Self {
            samples,
            mono,
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Channel-averaged samples, one per frame
    pub fn mono(&self) -> &[f32] {
        &self.mono
    }

    pub fn frame_count(&self) -> usize {
        self.mono.len()
    }

    /// Duration in seconds (`frame_count / sample_rate`)
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Frame index for a time, floored and clamped to the buffer
    pub fn frame_at(&self, seconds: f64) -> usize {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        ((seconds * self.sample_rate as f64).floor() as usize).min(self.frame_count())
    }

    /// Frame range covering `[start, end)` seconds
    pub fn frames_for(&self, start: f64, end: f64) -> Range<usize> {
        let a = self.frame_at(start);
        let b = self.frame_at(end).max(a);
        a..b
    }

    /// Interleaved samples for a frame range
    pub fn interleaved(&self, frames: Range<usize>) -> &[f32] {
        let ch = self.channels as usize;
        let end = frames.end.min(self.frame_count());
        let start = frames.start.min(end);
        &self.samples[start * ch..end * ch]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_mono_mix_and_duration() {
        let source = AudioSource::new(vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, 2);
        assert_eq!(source.frame_count(), 3);
        assert_eq!(source.mono(), &[0.5, 0.5, 0.0]);
        assert!((source.duration() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let source = AudioSource::new(vec![0.1, 0.2, 0.3], 44100, 2);
        assert_eq!(source.samples().len(), 2);
        assert_eq!(source.frame_count(), 1);
    }

    #[test]
    fn test_frame_range_clamped() {
        let source = AudioSource::new(vec![0.0; 100], 10, 1);
        assert_eq!(source.frames_for(-1.0, 2.5), 0..25);
        assert_eq!(source.frames_for(8.0, 50.0), 80..100);
        assert_eq!(source.interleaved(90..200).len(), 10);
    }
}
