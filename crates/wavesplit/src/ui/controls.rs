//! Toolbar and control panel views
//!
//! ```text
//! [Load Audio] [Save Markers] [Load Markers] [Export] [Concat]   file info
//! ┌ editor canvas ───────────────────────────────────────────────────────┐
//! └──────────────────────────────────────────────────────────────────────┘
//! scroll ════════════════════════════
//! Playback | Zoom | Markers | Auto-Detect Silence
//! ```

use super::app::WavesplitApp;
use super::message::Message;
use super::state::ExportMode;
use iced::widget::{button, column, container, row, slider, text, Space};
use iced::{Alignment, Element, Length};
use wavesplit_widgets::format_time;

/// File actions and the loaded file summary
pub fn view_file_bar(app: &WavesplitApp) -> Element<'_, Message> {
    let has_doc = app.document.is_some();
    let busy = app.loading || app.export.is_running();
    let has_markers = app
        .document
        .as_ref()
        .is_some_and(|doc| !doc.viewport.regions().markers().is_empty());

    let load_btn = button(text("Load Audio..."))
        .on_press_maybe((!busy).then_some(Message::OpenAudio))
        .style(button::primary);
    let save_markers_btn = button(text("Save Markers"))
        .on_press_maybe(has_markers.then_some(Message::SaveMarkers))
        .style(button::secondary);
    let load_markers_btn = button(text("Load Markers"))
        .on_press_maybe(has_doc.then_some(Message::LoadMarkers))
        .style(button::secondary);

    // Exporting needs at least one marker to split on
    let can_export = has_markers && !busy && app.export_service.is_some();
    let export_btn = button(text("Export Splits"))
        .on_press_maybe(can_export.then_some(Message::OpenExport(ExportMode::Splits)))
        .style(button::success);
    let concat_btn = button(text("Concat Splits"))
        .on_press_maybe(can_export.then_some(Message::OpenExport(ExportMode::Concat)))
        .style(button::success);

    let info = match &app.document {
        Some(doc) => format!(
            "File: {} | Duration: {} | Sample Rate: {} Hz",
            doc.file_name().unwrap_or_default(),
            format_time(doc.source.duration()),
            doc.source.sample_rate()
        ),
        None => String::new(),
    };

    row![
        load_btn,
        save_markers_btn,
        load_markers_btn,
        export_btn,
        concat_btn,
        Space::new().width(Length::Fill),
        text(info).size(13),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Horizontal scroll, shown only when zoomed in
pub fn view_scroll_bar(app: &WavesplitApp) -> Element<'_, Message> {
    match &app.document {
        Some(doc) if doc.viewport.view().zoom > 1.0 => {
            slider(0.0..=1.0, doc.viewport.scroll_fraction(), Message::SetScroll)
                .step(0.001)
                .into()
        }
        _ => Space::new().height(Length::Fixed(16.0)).into(),
    }
}

/// Playback, zoom, marker and silence detection groups
pub fn view_control_groups(app: &WavesplitApp) -> Element<'_, Message> {
    row![
        view_playback_group(app),
        view_zoom_group(app),
        view_marker_group(app),
        view_silence_group(app),
    ]
    .spacing(12)
    .height(Length::Shrink)
    .into()
}

fn group<'a>(title: &'a str, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(column![text(title).size(14), content.into()].spacing(8))
        .padding(10)
        .width(Length::FillPortion(1))
        .style(container::bordered_box)
        .into()
}

fn view_playback_group(app: &WavesplitApp) -> Element<'_, Message> {
    let has_doc = app.document.is_some();
    let play_btn = button(text("▶ Play")).on_press_maybe((has_doc && !app.playing).then_some(Message::Play));
    let stop_btn = button(text("⏹ Stop"))
        .on_press_maybe(app.playing.then_some(Message::Stop))
        .style(button::secondary);

    let position = app
        .document
        .as_ref()
        .map(|doc| {
            format!(
                "{} / {}",
                format_time(doc.viewport.cursor()),
                format_time(doc.source.duration())
            )
        })
        .unwrap_or_default();

    group(
        "Playback",
        column![row![play_btn, stop_btn].spacing(8), text(position).size(13)].spacing(6),
    )
}

fn view_zoom_group(app: &WavesplitApp) -> Element<'_, Message> {
    let display = &app.config.display;
    let zoom = app
        .document
        .as_ref()
        .map(|doc| doc.viewport.view().zoom)
        .unwrap_or(display.zoom);

    let horizontal = row![
        text("Horizontal:").size(13).width(Length::Fixed(80.0)),
        slider(1.0..=100.0, zoom, Message::SetZoom).step(0.5),
        text(format!("{:.1}x", zoom)).size(13).width(Length::Fixed(50.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let vertical = row![
        text("Vertical:").size(13).width(Length::Fixed(80.0)),
        slider(1..=50, display.vertical_zoom, Message::SetVerticalZoom),
        text(format!("{:.1}x", display.vertical_scale())).size(13).width(Length::Fixed(50.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    group("Zoom", column![horizontal, vertical].spacing(6))
}

fn view_marker_group(app: &WavesplitApp) -> Element<'_, Message> {
    let has_markers = app
        .document
        .as_ref()
        .is_some_and(|doc| !doc.viewport.regions().markers().is_empty());
    let clear_btn = button(text("Clear All Markers"))
        .on_press_maybe(has_markers.then_some(Message::ClearMarkers))
        .style(button::danger);

    let help = text(
        "Click: add marker | Right click: remove | Drag: move\n\
         Click split lane: exclude/include | Drag ruler: scrub",
    )
    .size(11);

    group("Markers", column![clear_btn, help].spacing(6))
}

fn view_silence_group(app: &WavesplitApp) -> Element<'_, Message> {
    let silence = &app.config.silence;

    let threshold = row![
        text("Threshold:").size(13).width(Length::Fixed(80.0)),
        slider(-80.0..=0.0, silence.threshold_db, Message::SetSilenceThreshold).step(1.0),
        text(format!("{:.0} dB", silence.threshold_db)).size(13).width(Length::Fixed(60.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let min_duration = row![
        text("Min length:").size(13).width(Length::Fixed(80.0)),
        slider(0.1..=10.0, silence.min_duration, Message::SetSilenceMinDuration).step(0.1),
        text(format!("{:.1} s", silence.min_duration)).size(13).width(Length::Fixed(60.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let can_detect = app.document.is_some() && !app.detecting;
    let detect_btn = button(text(if app.detecting { "Detecting..." } else { "Detect Silence" }))
        .on_press_maybe(can_detect.then_some(Message::DetectSilence));

    group(
        "Auto-Detect Silence",
        column![threshold, min_duration, detect_btn].spacing(6),
    )
}
