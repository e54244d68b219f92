//! Reusable interactive pieces: fields composed into forms, modal overlays, and
//! the streaming log buffer.

pub mod button;
pub mod checkbox;
pub mod confirm;
pub mod dir_picker;
pub mod field;
pub mod form;
pub mod help;
pub mod model_picker;
pub mod overlay;
pub mod progress;
pub mod selection;
pub mod stream_buffer;
pub mod task_editor;
pub mod text_field;
pub mod theme;

pub use button::Button;
pub use checkbox::Checkbox;
pub use confirm::ConfirmDialog;
pub use dir_picker::{resolve_directory, DirPicker, DirPickerMode, SelectedDirectory};
pub use field::{ActivationKind, Effect, Field, FieldResult, FieldValue};
pub use form::{Form, FormEvent};
pub use help::{hint_line, shortcuts_for, HelpOverlay, HelpTopic, Shortcut};
pub use model_picker::ModelPicker;
pub use overlay::{Overlay, OverlayEvent, Visibility};
pub use progress::Progress;
pub use selection::{clamp_selection, Selection};
pub use stream_buffer::StreamBuffer;
pub use task_editor::{TaskEdit, TaskEditor};
pub use text_field::TextField;
pub use theme::Theme;

use ratatui::text::Line;

/// Concatenated span contents of a rendered line, without styling.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}
