//! Export modal UI
//!
//! Encode options, output location and progress for both per-split export
//! and concatenation.

use super::message::Message;
use super::state::{ExportMode, ExportPhase, ExportState};
use crate::config::Config;
use iced::widget::{button, checkbox, column, container, pick_list, progress_bar, row, scrollable, text, text_input, Space};
use iced::{Alignment, Element, Length};
use wavesplit_core::export::{check_encodable, ChannelLayout, EncodeTarget, ExportFormat, Quality, SAMPLE_RATES};

const LABEL_WIDTH: f32 = 110.0;

/// Render the export modal content
pub fn view<'a>(state: &'a ExportState, config: &'a Config) -> Element<'a, Message> {
    let title = text(state.mode.title()).size(24);
    let close_btn = button(text("×").size(20))
        .on_press_maybe((!state.is_running()).then_some(Message::CloseExport))
        .style(button::secondary);

    let header = row![title, Space::new().width(Length::Fill), close_btn]
        .align_y(Alignment::Center)
        .width(Length::Fill);

    let content: Element<Message> = match &state.phase {
        ExportPhase::Configure => view_options(state, config),
        ExportPhase::Exporting { .. } => view_exporting(&state.phase),
        ExportPhase::Complete { failed_files, .. } => view_complete(&state.phase, failed_files),
        ExportPhase::Cancelled => text("Export cancelled").size(14).into(),
    };

    let actions = view_actions(state);

    let body = column![header, content, actions].spacing(20).width(Length::Fixed(520.0));

    container(body)
        .padding(24)
        .style(container::rounded_box)
        .into()
}

fn labeled<'a>(label: &'a str, control: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    row![
        text(label).size(14).width(Length::Fixed(LABEL_WIDTH)),
        control.into(),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn view_options<'a>(state: &'a ExportState, config: &'a Config) -> Element<'a, Message> {
    let (target, trim, folder): (EncodeTarget, bool, &std::path::Path) = match state.mode {
        ExportMode::Splits => (
            config.export.target(),
            config.export.trim_silence,
            config.export.output_folder.as_path(),
        ),
        ExportMode::Concat => (
            config.concat.target(),
            config.concat.trim_silence,
            config.concat.output_folder.as_path(),
        ),
    };

    let format = labeled(
        "Format:",
        pick_list(ExportFormat::ALL, Some(target.format), Message::SetExportFormat),
    );
    let sample_rate = labeled(
        "Sample rate:",
        pick_list(SAMPLE_RATES, Some(target.sample_rate), Message::SetExportSampleRate),
    );
    let channels = labeled(
        "Channels:",
        pick_list(ChannelLayout::ALL, Some(target.channels), Message::SetExportChannels),
    );

    // Bitrate only matters for lossy formats
    let quality: Element<Message> = if matches!(target.format, ExportFormat::Mp3 | ExportFormat::Ogg) {
        labeled(
            "Quality:",
            pick_list(Quality::ALL, Some(target.quality), Message::SetExportQuality),
        )
    } else {
        Space::new().height(Length::Shrink).into()
    };

    let naming: Element<Message> = match state.mode {
        ExportMode::Splits => {
            let example = wavesplit_core::timeline::split_filename(
                &config.export.prefix,
                1,
                1,
                target.format.extension(),
            );
            column![
                labeled(
                    "Filename prefix:",
                    text_input("split", &config.export.prefix).on_input(Message::SetExportPrefix),
                ),
                text(format!("Files are named like {}", example)).size(12),
            ]
            .spacing(6)
            .into()
        }
        ExportMode::Concat => column![
            labeled(
                "Filename:",
                text_input("concatenated", &config.concat.filename).on_input(Message::SetConcatFilename),
            ),
            labeled(
                "Gap (ms):",
                text_input("500", &state.draft_silence_ms).on_input(Message::SetConcatSilence),
            ),
        ]
        .spacing(6)
        .into(),
    };

    let folder_row = labeled(
        "Output folder:",
        row![
            text(folder.display().to_string()).size(13).width(Length::Fill),
            button(text("Browse...")).on_press(Message::PickOutputFolder).style(button::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    );

    let trim_checkbox = checkbox(trim)
        .label("Trim leading/trailing silence")
        .on_toggle(Message::SetTrimSilence)
        .size(16);

    let mut options = column![format, sample_rate, channels, quality, naming, folder_row, trim_checkbox].spacing(12);
    if let Err(e) = check_encodable(&target) {
        options = options.push(text(format!("{}; pick another sample rate", e)).size(12));
    }
    options.into()
}

fn view_exporting(phase: &ExportPhase) -> Element<'_, Message> {
    column![
        progress_bar(0.0..=1.0, phase.progress()),
        text(phase.status_message()).size(14),
    ]
    .spacing(10)
    .into()
}

fn view_complete<'a>(phase: &'a ExportPhase, failed_files: &'a [(String, String)]) -> Element<'a, Message> {
    let summary = text(phase.status_message()).size(16);
    if failed_files.is_empty() {
        return summary.into();
    }

    let failures: Vec<Element<Message>> = failed_files
        .iter()
        .map(|(file, error)| text(format!("{}: {}", file, error)).size(12).into())
        .collect();

    column![
        summary,
        text("Failed:").size(14),
        scrollable(column(failures).spacing(4)).height(Length::Fixed(150.0)),
    ]
    .spacing(10)
    .into()
}

fn view_actions(state: &ExportState) -> Element<'_, Message> {
    let buttons: Element<Message> = match &state.phase {
        ExportPhase::Configure => row![
            button(text("Cancel")).on_press(Message::CloseExport).style(button::secondary),
            button(text(match state.mode {
                ExportMode::Splits => "Export",
                ExportMode::Concat => "Concat",
            }))
            .on_press(Message::StartExport)
            .style(button::primary),
        ]
        .spacing(10)
        .into(),
        ExportPhase::Exporting { .. } => button(text("Cancel"))
            .on_press(Message::CancelExport)
            .style(button::danger)
            .into(),
        ExportPhase::Complete { .. } | ExportPhase::Cancelled => button(text("Close"))
            .on_press(Message::CloseExport)
            .style(button::primary)
            .into(),
    };

    row![Space::new().width(Length::Fill), buttons]
        .width(Length::Fill)
        .into()
}
