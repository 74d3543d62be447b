//! Confirmation modal
//!
//! Asks before an action throws away every marker of the open file.

use super::message::Message;
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Color, Element, Length};
use wavesplit_core::silence::SilentRegion;

/// What is waiting for confirmation
#[derive(Debug, Clone)]
pub enum ConfirmTarget {
    /// Remove all markers and exclusions
    ClearMarkers { count: usize },
    /// Swap the current markers for one marker per silent region
    ReplaceWithSilence {
        regions: Vec<SilentRegion>,
        existing: usize,
    },
}

/// State for the confirmation modal
#[derive(Debug, Clone, Default)]
pub struct ConfirmState {
    pub target: Option<ConfirmTarget>,
}

impl ConfirmState {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn show(&mut self, target: ConfirmTarget) {
        self.target = Some(target);
    }

    /// Close without acting
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Close and hand the pending action to the caller
    pub fn take(&mut self) -> Option<ConfirmTarget> {
        self.target.take()
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Render the confirmation modal
pub fn view(state: &ConfirmState) -> Element<'_, Message> {
    let Some(target) = &state.target else {
        return Space::new().into();
    };

    let (title, description, confirm_label) = match target {
        ConfirmTarget::ClearMarkers { count } => (
            "Clear Markers",
            format!("Remove all {} marker{} and split exclusions?", count, plural(*count)),
            "Clear",
        ),
        ConfirmTarget::ReplaceWithSilence { regions, existing } => (
            "Replace Markers",
            format!(
                "Found {} silent region{}. Replace the {} existing marker{}?",
                regions.len(),
                plural(regions.len()),
                existing,
                plural(*existing)
            ),
            "Replace",
        ),
    };

    let close_btn = button(text("×").size(20))
        .on_press(Message::CancelConfirm)
        .style(button::secondary);
    let header = row![text(title).size(24), Space::new().width(Length::Fill), close_btn]
        .align_y(Alignment::Center)
        .width(Length::Fill);

    let warning = text("This cannot be undone.")
        .size(12)
        .color(Color::from_rgb(0.5, 0.5, 0.5));

    let cancel_btn = button(text("Cancel"))
        .on_press(Message::CancelConfirm)
        .style(button::secondary);
    let confirm_btn = button(text(confirm_label))
        .on_press(Message::Confirm)
        .style(button::danger);
    let actions = row![Space::new().width(Length::Fill), cancel_btn, confirm_btn]
        .spacing(10)
        .width(Length::Fill);

    let body = column![header, text(description).size(16), warning, actions]
        .spacing(15)
        .width(Length::Fixed(420.0));

    container(body)
        .padding(30)
        .style(container::rounded_box)
        .into()
}
