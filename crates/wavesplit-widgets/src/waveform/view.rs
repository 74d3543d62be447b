//! Split editor view function

use super::canvas::{EditorCanvas, PointerEvent};
use super::state::EditorState;
use iced::widget::Canvas;
use iced::{Element, Length};

/// Create the split editor surface
///
/// `on_pointer` receives every press, drag, release, wheel and resize in
/// surface coordinates.
///
/// ```ignore
/// let editor = split_editor(&self.editor_state, Message::Pointer);
/// ```
pub fn split_editor<'a, Message>(
    state: &'a EditorState,
    on_pointer: impl Fn(PointerEvent) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(EditorCanvas { state, on_pointer })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
