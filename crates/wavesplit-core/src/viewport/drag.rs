//! Pointer drag state machine
//!
//! ```text
//! Idle --press on target--> Pressed --moved past dead-zone--> Dragging
//!                              |                                 |
//!                           release                           release
//!                              v                                 v
//!                        Released (click)               Released (commit)
//!                              \_____________> Idle <___________/
//! ```
//!
//! The same machine serves marker drags, playback icon drags, and plain
//! clicks on splits or the waveform. It only decides *what* happened; the
//! viewport applies the resulting [`DragEffect`].

use crate::timeline::TimeAxis;

/// Horizontal movement (px) before a press becomes a drag
pub const DEAD_ZONE_PX: f64 = 3.0;

/// What the pointer was pressed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    /// A marker, tracked by its current time
    Marker(f64),
    /// The playback icon in the ruler lane
    PlaybackIcon,
    /// Bare ruler lane away from the icon
    Ruler,
    /// Body of the split containing this time
    Split(f64),
    /// Waveform area away from any marker
    Waveform(f64),
}

impl DragTarget {
    fn is_draggable(&self) -> bool {
        matches!(self, Self::Marker(_) | Self::PlaybackIcon | Self::Ruler)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed { target: DragTarget, origin_x: f64 },
    Dragging { target: DragTarget },
}

/// Outcome of a pointer event for the viewport to apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Move a marker while dragging or on commit
    MoveMarker { from: f64, to: f64 },
    /// Move the playback cursor without touching the transport
    Scrub(f64),
    /// Relocate the cursor and (re)start playback there
    RestartPlaybackAt(f64),
    /// Click on a split body
    ToggleExclusion(f64),
    /// Click on the waveform away from a marker
    AddMarker(f64),
}

#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    phase: DragPhase,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// The pointer holds the playback cursor (icon or ruler)
    pub fn is_scrubbing(&self) -> bool {
        matches!(
            self.phase,
            DragPhase::Pressed {
                target: DragTarget::PlaybackIcon | DragTarget::Ruler,
                ..
            } | DragPhase::Dragging {
                target: DragTarget::PlaybackIcon | DragTarget::Ruler,
            }
        )
    }

    /// Marker currently held by the pointer, if any
    pub fn held_marker(&self) -> Option<f64> {
        match self.phase {
            DragPhase::Pressed { target: DragTarget::Marker(t), .. }
            | DragPhase::Dragging { target: DragTarget::Marker(t) } => Some(t),
            _ => None,
        }
    }

    /// Primary button pressed on a target
    pub fn press(&mut self, target: DragTarget, x: f64) {
        self.phase = DragPhase::Pressed {
            target,
            origin_x: x,
        };
    }

    /// Pointer moved to `x`
    pub fn motion(&mut self, x: f64, axis: &TimeAxis) -> Option<DragEffect> {
        match self.phase {
            DragPhase::Pressed { target, origin_x } => {
                if (x - origin_x).abs() <= DEAD_ZONE_PX || !target.is_draggable() {
                    return None;
                }
                self.phase = DragPhase::Dragging { target };
                Self::drag_effect(target, x, axis)
            }
            DragPhase::Dragging { target } => Self::drag_effect(target, x, axis),
            _ => None,
        }
    }

    /// Primary button released at `x`
    pub fn release(&mut self, x: f64, axis: &TimeAxis) -> Option<DragEffect> {
        let effect = match self.phase {
            DragPhase::Pressed { target, .. } => match target {
                DragTarget::PlaybackIcon | DragTarget::Ruler => {
                    Some(DragEffect::RestartPlaybackAt(axis.time_for_pixel(x)))
                }
                DragTarget::Split(t) => Some(DragEffect::ToggleExclusion(t)),
                DragTarget::Waveform(t) => Some(DragEffect::AddMarker(t)),
                DragTarget::Marker(_) => None,
            },
            DragPhase::Dragging { target } => match target {
                DragTarget::PlaybackIcon | DragTarget::Ruler => {
                    Some(DragEffect::RestartPlaybackAt(axis.time_for_pixel(x)))
                }
                _ => Self::drag_effect(target, x, axis),
            },
            DragPhase::Idle => None,
        };
        // Released is the returned effect; the machine is ready again
        self.phase = DragPhase::Idle;
        effect
    }

    /// Abort any gesture without effects
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Update the held marker after the store applied (or clamped) a move
    pub fn track_marker(&mut self, t: f64) {
        match &mut self.phase {
            DragPhase::Pressed {
                target: DragTarget::Marker(held),
                ..
            }
            | DragPhase::Dragging {
                target: DragTarget::Marker(held),
            } => *held = t,
            _ => {}
        }
    }

    fn drag_effect(target: DragTarget, x: f64, axis: &TimeAxis) -> Option<DragEffect> {
        let t = axis.time_for_pixel(x);
        match target {
            DragTarget::Marker(from) => Some(DragEffect::MoveMarker { from, to: t }),
            DragTarget::PlaybackIcon | DragTarget::Ruler => Some(DragEffect::Scrub(t)),
            DragTarget::Split(_) | DragTarget::Waveform(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ViewportState;

    fn axis() -> TimeAxis {
        // 1 px == 0.1 s
        TimeAxis::new(
            100.0,
            44100,
            ViewportState {
                width_px: 1000.0,
                ..ViewportState::default()
            },
        )
    }

    #[test]
    fn test_press_release_in_dead_zone_is_click() {
        let a = axis();
        let mut m = DragMachine::new();
        m.press(DragTarget::PlaybackIcon, 100.0);
        assert_eq!(m.motion(102.0, &a), None);
        assert!(!m.is_dragging());
        let effect = m.release(102.0, &a);
        assert!(matches!(effect, Some(DragEffect::RestartPlaybackAt(t)) if (t - 10.2).abs() < 1e-9));
        assert_eq!(m.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_marker_drag_moves_continuously_then_commits() {
        let a = axis();
        let mut m = DragMachine::new();
        m.press(DragTarget::Marker(20.0), 200.0);
        let first = m.motion(210.0, &a);
        assert!(m.is_dragging());
        assert!(matches!(first, Some(DragEffect::MoveMarker { from, to }) if from == 20.0 && (to - 21.0).abs() < 1e-9));
        m.track_marker(21.0);
        assert_eq!(m.held_marker(), Some(21.0));
        let last = m.release(220.0, &a);
        assert!(matches!(last, Some(DragEffect::MoveMarker { from, to }) if from == 21.0 && (to - 22.0).abs() < 1e-9));
        assert_eq!(m.held_marker(), None);
    }

    #[test]
    fn test_marker_click_without_drag_is_noop() {
        let a = axis();
        let mut m = DragMachine::new();
        m.press(DragTarget::Marker(20.0), 200.0);
        assert_eq!(m.release(201.0, &a), None);
    }

    #[test]
    fn test_icon_drag_scrubs_then_restarts() {
        let a = axis();
        let mut m = DragMachine::new();
        m.press(DragTarget::PlaybackIcon, 0.0);
        assert!(matches!(m.motion(50.0, &a), Some(DragEffect::Scrub(_))));
        assert!(matches!(m.release(60.0, &a), Some(DragEffect::RestartPlaybackAt(t)) if (t - 6.0).abs() < 1e-9));
    }

    #[test]
    fn test_split_click_toggles_and_drag_does_nothing() {
        let a = axis();
        let mut m = DragMachine::new();
        m.press(DragTarget::Split(12.0), 120.0);
        assert_eq!(m.release(120.0, &a), Some(DragEffect::ToggleExclusion(12.0)));

        m.press(DragTarget::Waveform(12.0), 120.0);
        assert_eq!(m.motion(300.0, &a), None);
        assert_eq!(m.release(300.0, &a), Some(DragEffect::AddMarker(12.0)));
    }

    #[test]
    fn test_release_while_idle() {
        let mut m = DragMachine::new();
        assert_eq!(m.release(10.0, &axis()), None);
        m.press(DragTarget::Ruler, 10.0);
        m.cancel();
        assert_eq!(m.phase(), &DragPhase::Idle);
    }
}
