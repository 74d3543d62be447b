//! Playback transport
//!
//! The editor only needs a handful of transport operations; anything that
//! can seek, start, stop and report a position can drive the cursor.
//!
//! - [`NullTransport`]: wall-clock driven, no audio device required
//! - `CpalTransport` (feature `cpal-output`): real output through cpal

mod error;

#[cfg(feature = "cpal-output")]
mod cpal_output;

pub use error::{PlaybackError, PlaybackResult};

#[cfg(feature = "cpal-output")]
pub use cpal_output::{CpalTransport, PlaybackAtomics};

use std::time::Instant;

/// Transport controls used by the editor
pub trait PlaybackTransport {
    /// Move the play position (seconds); keeps the playing state
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    /// Current play position in seconds
    fn position(&self) -> f64;
}

/// Stop, seek, then play from `seconds`
///
/// Used when a scrub or split click asks playback to continue from a new
/// point. Stopping first keeps output devices from playing a fragment of
/// the old position.
pub fn restart_at(transport: &mut dyn PlaybackTransport, seconds: f64) {
    if transport.is_playing() {
        transport.stop();
    }
    transport.seek(seconds);
    transport.play();
}

/// Clock-driven transport with no audio output
///
/// Position advances with wall time while playing and stops at the
/// duration.
#[derive(Debug, Clone)]
pub struct NullTransport {
    duration: f64,
    /// Position when playback last started or was seeked
    anchor: f64,
    started: Option<Instant>,
}

impl NullTransport {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            anchor: 0.0,
            started: None,
        }
    }

    fn elapsed(&self) -> f64 {
        self.started
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl PlaybackTransport for NullTransport {
    fn seek(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds } else { 0.0 };
        self.anchor = seconds.clamp(0.0, self.duration);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.anchor >= self.duration {
            self.anchor = 0.0;
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.anchor = self.position();
        self.started = None;
    }

    fn is_playing(&self) -> bool {
        self.started.is_some() && self.anchor + self.elapsed() < self.duration
    }

    fn position(&self) -> f64 {
        (self.anchor + self.elapsed()).min(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Records every call in order
    #[derive(Default)]
    struct RecordingTransport {
        calls: Vec<String>,
        playing: bool,
        position: f64,
    }

    impl PlaybackTransport for RecordingTransport {
        fn seek(&mut self, seconds: f64) {
            self.calls.push(format!("seek {}", seconds));
            self.position = seconds;
        }
        fn play(&mut self) {
            self.calls.push("play".to_string());
            self.playing = true;
        }
        fn stop(&mut self) {
            self.calls.push("stop".to_string());
            self.playing = false;
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn position(&self) -> f64 {
            self.position
        }
    }

    #[test]
    fn test_restart_stops_before_seeking() {
        let mut transport = RecordingTransport {
            playing: true,
            ..Default::default()
        };
        restart_at(&mut transport, 12.5);
        assert_eq!(transport.calls, vec!["stop", "seek 12.5", "play"]);
        assert!(transport.is_playing());
        assert_eq!(transport.position(), 12.5);
    }

    #[test]
    fn test_restart_from_stopped_skips_stop() {
        let mut transport = RecordingTransport::default();
        restart_at(&mut transport, 3.0);
        assert_eq!(transport.calls, vec!["seek 3", "play"]);
    }

    #[test]
    fn test_null_transport_clock() {
        let mut transport = NullTransport::new(10.0);
        transport.seek(4.0);
        assert!(!transport.is_playing());
        assert_eq!(transport.position(), 4.0);

        transport.play();
        std::thread::sleep(Duration::from_millis(30));
        assert!(transport.is_playing());
        let pos = transport.position();
        assert!(pos > 4.0 && pos < 5.0, "position {}", pos);

        transport.stop();
        let stopped_at = transport.position();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(transport.position(), stopped_at);
    }

    #[test]
    fn test_null_transport_clamps_and_ends() {
        let mut transport = NullTransport::new(0.02);
        transport.seek(50.0);
        assert_eq!(transport.position(), 0.02);
        transport.seek(f64::NAN);
        assert_eq!(transport.position(), 0.0);

        transport.play();
        std::thread::sleep(Duration::from_millis(40));
        assert!(!transport.is_playing());
        assert_eq!(transport.position(), 0.02);
    }
}
