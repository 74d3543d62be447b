//! Canvas Program for the split editor
//!
//! Three lanes stacked top to bottom:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ ruler: ticks, time labels, playback icon ▼   │  ruler_height
//! ├──────────────────────────────────────────────┤
//! │ splits:  1  │  2  │ 3 (X) │  4               │  splits_height
//! ├──────────────────────────────────────────────┤
//! │ waveform peaks, markers with time labels,    │
//! │ dashed playback line                         │  remaining height
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Pointer input is translated to [`PointerEvent`]s in surface coordinates
//! and published through the `on_pointer` callback; the engine decides what
//! a press or drag means.

use super::state::EditorState;
use crate::theme;
use crate::time_format::{format_time, tick_interval, tick_times};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, LineDash, Path, Program, Stroke, Text};
use iced::{mouse, Point, Rectangle, Size, Theme};

/// Pointer input in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
    Released { x: f32 },
    SecondaryPressed { x: f32, y: f32 },
    /// Wheel over the surface; positive `lines` scrolls up
    Scrolled { x: f32, lines: f32 },
    /// The canvas was laid out at a new size
    Resized { width: f32, height: f32 },
}

/// Canvas-local interaction state
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorInteraction {
    /// Primary button is down (keeps tracking outside the bounds)
    pub pressed: bool,
    /// Last size reported through `Resized`
    pub size: Option<Size>,
}

pub struct EditorCanvas<'a, Message, F>
where
    F: Fn(PointerEvent) -> Message,
{
    pub state: &'a EditorState,
    pub on_pointer: F,
}

impl<'a, Message, F> Program<Message> for EditorCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(PointerEvent) -> Message,
{
    type State = EditorInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        // Report layout changes first; the next event carries the input
        if interaction.size != Some(bounds.size())
            && !matches!(event, Event::Mouse(mouse::Event::ButtonPressed(_)))
        {
            interaction.size = Some(bounds.size());
            return Some(canvas::Action::publish((self.on_pointer)(PointerEvent::Resized {
                width: bounds.width,
                height: bounds.height,
            })));
        }

        // While pressed, follow the pointer even outside the canvas
        if interaction.pressed {
            let position = cursor.position().map(|p| Point::new(p.x - bounds.x, p.y - bounds.y));
            match (event, position) {
                (Event::Mouse(mouse::Event::CursorMoved { .. }), Some(p)) => {
                    return Some(canvas::Action::publish((self.on_pointer)(PointerEvent::Moved {
                        x: p.x.clamp(0.0, bounds.width),
                        y: p.y,
                    })));
                }
                (Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)), p) => {
                    interaction.pressed = false;
                    let x = p.map(|p| p.x.clamp(0.0, bounds.width)).unwrap_or(0.0);
                    return Some(canvas::Action::publish((self.on_pointer)(PointerEvent::Released { x })));
                }
                _ => return None,
            }
        }

        let position = cursor.position_in(bounds)?;
        let pointer = match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                interaction.pressed = true;
                PointerEvent::Pressed {
                    x: position.x,
                    y: position.y,
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                PointerEvent::SecondaryPressed {
                    x: position.x,
                    y: position.y,
                }
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / 20.0,
                };
                PointerEvent::Scrolled {
                    x: position.x,
                    lines,
                }
            }
            _ => return None,
        };

        let action = canvas::Action::publish((self.on_pointer)(pointer));
        Some(if matches!(pointer, PointerEvent::Scrolled { .. }) {
            action.and_capture()
        } else {
            action
        })
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.pressed {
            return mouse::Interaction::Grabbing;
        }
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        if position.y < self.state.ruler_height {
            return mouse::Interaction::Pointer;
        }
        let near_marker = self
            .state
            .markers
            .iter()
            .any(|m| (m.x - position.x).abs() <= 10.0);
        if near_marker {
            mouse::Interaction::ResizingHorizontally
        } else {
            mouse::Interaction::Crosshair
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), theme::BACKGROUND);

        if !self.state.has_audio {
            frame.fill_text(Text {
                content: "Open an audio file to start".to_string(),
                position: Point::new(bounds.width / 2.0, bounds.height / 2.0),
                size: 16.0.into(),
                color: theme::RULER_TEXT,
                align_x: Horizontal::Center.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        draw_ruler(&mut frame, self.state, bounds.width);
        draw_split_lane(&mut frame, self.state);
        draw_waveform(&mut frame, self.state, bounds.height);
        draw_markers(&mut frame, self.state, bounds.height);
        draw_playhead(&mut frame, self.state, bounds.height);

        vec![frame.into_geometry()]
    }
}

fn draw_ruler(frame: &mut Frame, state: &EditorState, width: f32) {
    let height = state.ruler_height;
    frame.fill_rectangle(Point::ORIGIN, Size::new(width, height), theme::RULER_BACKGROUND);

    let visible = state.visible_seconds();
    if visible <= 0.0 {
        return;
    }
    let step = tick_interval(visible, width as f64, theme::MIN_TICK_SPACING_PX);
    for t in tick_times(state.visible_start, state.visible_end, step) {
        let x = ((t - state.visible_start) / visible * width as f64) as f32;
        frame.stroke(
            &Path::line(Point::new(x, height - 8.0), Point::new(x, height)),
            Stroke::default().with_color(theme::RULER_TICK).with_width(1.0),
        );
        frame.fill_text(Text {
            content: format_time(t),
            position: Point::new(x + 3.0, 3.0),
            size: theme::LABEL_SIZE.into(),
            color: theme::RULER_TEXT,
            align_x: Horizontal::Left.into(),
            align_y: Vertical::Top.into(),
            ..Text::default()
        });
    }
}

fn draw_split_lane(frame: &mut Frame, state: &EditorState) {
    let top = state.ruler_height;
    let height = state.splits_height;

    for split in &state.splits {
        let x = split.pixel_start as f32;
        let w = (split.pixel_end - split.pixel_start) as f32;
        let fill = if split.excluded {
            theme::SPLIT_EXCLUDED_FILL
        } else {
            theme::SPLIT_FILLS[split.number % 2]
        };
        frame.fill_rectangle(Point::new(x, top), Size::new(w, height), fill);

        // Label only when there is room for it
        if w < 18.0 {
            continue;
        }
        let (content, color) = if split.excluded {
            (format!("{} (X)", split.number), theme::SPLIT_EXCLUDED_TEXT)
        } else {
            (split.number.to_string(), theme::SPLIT_TEXT)
        };
        frame.fill_text(Text {
            content,
            position: Point::new(x + w / 2.0, top + height / 2.0),
            size: theme::SPLIT_LABEL_SIZE.into(),
            color,
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
    }
}

fn draw_waveform(frame: &mut Frame, state: &EditorState, height: f32) {
    let top = state.waveform_top();
    let lane_height = (height - top).max(0.0);
    let center_y = top + lane_height / 2.0;
    let half = lane_height / 2.0;

    // Shade excluded splits behind the peaks
    for split in state.splits.iter().filter(|s| s.excluded) {
        frame.fill_rectangle(
            Point::new(split.pixel_start as f32, top),
            Size::new((split.pixel_end - split.pixel_start) as f32, lane_height),
            theme::EXCLUDED_OVERLAY,
        );
    }

    frame.stroke(
        &Path::line(Point::new(0.0, center_y), Point::new(state.peaks.len() as f32, center_y)),
        Stroke::default().with_color(theme::CENTER_LINE).with_width(1.0),
    );

    let scale = state.vertical_scale;
    for (column, peak) in state.peaks.iter().enumerate() {
        let x = column as f32 + 0.5;
        let excluded = state
            .splits
            .iter()
            .any(|s| s.excluded && (s.pixel_start as f32) <= x && x < s.pixel_end as f32);
        let color = if excluded { theme::WAVEFORM_EXCLUDED } else { theme::WAVEFORM };

        let y_max = center_y - (peak.max * scale).clamp(-1.0, 1.0) * half;
        let y_min = center_y - (peak.min * scale).clamp(-1.0, 1.0) * half;
        frame.fill_rectangle(Point::new(column as f32, y_max), Size::new(1.0, (y_min - y_max).max(1.0)), color);
    }
}

fn draw_markers(frame: &mut Frame, state: &EditorState, height: f32) {
    let top = state.waveform_top();
    for marker in &state.markers {
        let (color, width) = if marker.held {
            (theme::MARKER_HELD, 3.0)
        } else {
            (theme::MARKER, 2.0)
        };
        frame.stroke(
            &Path::line(Point::new(marker.x, state.ruler_height), Point::new(marker.x, height)),
            Stroke::default().with_color(color).with_width(width),
        );
        frame.fill_text(Text {
            content: format_time(marker.time),
            position: Point::new(marker.x + 4.0, top + 3.0),
            size: theme::LABEL_SIZE.into(),
            color: theme::MARKER_TEXT,
            align_x: Horizontal::Left.into(),
            align_y: Vertical::Top.into(),
            ..Text::default()
        });
    }
}

fn draw_playhead(frame: &mut Frame, state: &EditorState, height: f32) {
    let Some(x) = state.playhead_x else {
        return;
    };

    // Down-pointing triangle sitting on the ruler's bottom edge
    let base_y = state.ruler_height - theme::PLAYHEAD_ICON_HEIGHT;
    let triangle = Path::new(|builder| {
        builder.move_to(Point::new(x - theme::PLAYHEAD_ICON_HALF_WIDTH, base_y));
        builder.line_to(Point::new(x + theme::PLAYHEAD_ICON_HALF_WIDTH, base_y));
        builder.line_to(Point::new(x, state.ruler_height));
        builder.close();
    });
    frame.fill(&triangle, theme::PLAYHEAD);

    frame.stroke(
        &Path::line(Point::new(x, state.ruler_height), Point::new(x, height)),
        Stroke {
            line_dash: LineDash {
                segments: theme::PLAYHEAD_DASH,
                offset: 0,
            },
            ..Stroke::default().with_color(theme::PLAYHEAD).with_width(1.5)
        },
    );
}
