//! Split editor surface
//!
//! - **State** ([`EditorState`]): pure render snapshot built from the engine
//! - **View function** ([`split_editor`]): state + callback → `Element`
//! - **Canvas Program**: drawing and pointer-to-callback translation

mod canvas;
mod state;
mod view;

pub use canvas::{EditorInteraction, PointerEvent};
pub use state::{EditorState, MarkerMark};
pub use view::split_editor;
