//! Immediate-mode GUI: windows and widgets laid out and hit-tested here,
//! drawn by whatever replays the resulting `DrawCommand`s.

pub mod context;
pub mod rect;
pub mod style;
pub mod widgets;

pub use context::{Gui, Interaction, PointerState};
pub use rect::Rect;
pub use style::GuiStyle;
pub use widgets::Ui;
