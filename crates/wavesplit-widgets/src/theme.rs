//! Colors and sizes for the split editor surface

use iced::Color;

pub const BACKGROUND: Color = Color::from_rgb(0.08, 0.08, 0.1);
pub const RULER_BACKGROUND: Color = Color::from_rgb(0.12, 0.12, 0.14);
pub const RULER_TICK: Color = Color::from_rgba(0.7, 0.7, 0.75, 0.8);
pub const RULER_TEXT: Color = Color::from_rgb(0.65, 0.65, 0.7);

pub const WAVEFORM: Color = Color::from_rgb(0.0, 0.8, 0.8);
pub const WAVEFORM_EXCLUDED: Color = Color::from_rgba(0.0, 0.5, 0.5, 0.4);
pub const CENTER_LINE: Color = Color::from_rgba(0.4, 0.4, 0.4, 0.5);

/// Split lane fill, alternating so neighbours stay distinguishable
pub const SPLIT_FILLS: [Color; 2] = [
    Color::from_rgb(0.15, 0.15, 0.25),
    Color::from_rgb(0.18, 0.18, 0.3),
];
pub const SPLIT_EXCLUDED_FILL: Color = Color::from_rgb(0.3, 0.12, 0.12);
pub const SPLIT_TEXT: Color = Color::from_rgb(0.7, 0.7, 0.9);
pub const SPLIT_EXCLUDED_TEXT: Color = Color::from_rgb(0.9, 0.5, 0.5);
/// Shade laid over the waveform of excluded splits
pub const EXCLUDED_OVERLAY: Color = Color::from_rgba(0.5, 0.1, 0.1, 0.25);

pub const MARKER: Color = Color::from_rgb(1.0, 0.6, 0.0);
/// Marker currently held by a drag
pub const MARKER_HELD: Color = Color::from_rgb(1.0, 1.0, 0.0);
pub const MARKER_TEXT: Color = Color::from_rgb(1.0, 0.75, 0.4);

pub const PLAYHEAD: Color = Color::from_rgb(1.0, 1.0, 1.0);

/// Half-width of the playback triangle in the ruler
pub const PLAYHEAD_ICON_HALF_WIDTH: f32 = 7.0;
pub const PLAYHEAD_ICON_HEIGHT: f32 = 12.0;
/// Dash pattern for the playback line through the waveform
pub const PLAYHEAD_DASH: &[f32] = &[4.0, 3.0];

pub const LABEL_SIZE: f32 = 11.0;
pub const SPLIT_LABEL_SIZE: f32 = 13.0;

/// Minimum pixel distance between ruler ticks
pub const MIN_TICK_SPACING_PX: f64 = 80.0;
