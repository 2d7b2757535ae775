// gui/context.rs
//
// Immediate-mode GUI state. Each frame the caller opens windows and declares
// widgets; the context hit-tests them against the pointer and records draw
// commands. Only two things outlive a frame: the widget currently held by the
// pointer and per-window collapse/size state.
//
// Usage:
//   gui.begin_frame(&input);
//   gui.window("Test Window", &mut open, |ui| {
//       ui.text("Test Text.");
//       if ui.button("Button") { log::info!("Click"); }
//   });
//   draw_list.extend(gui.end_frame());

use std::collections::HashMap;

use glam::Vec2;

use crate::input::{InputState, MouseButton};
use crate::renderer::{Color, DrawCommand};

use super::rect::Rect;
use super::style::GuiStyle;
use super::widgets::Ui;

/// Left-button pointer snapshot taken at `begin_frame`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
}

impl PointerState {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            position: input.mouse_position(),
            down: input.is_mouse_down(MouseButton::Left),
            pressed: input.is_mouse_pressed(MouseButton::Left),
            released: input.is_mouse_released(MouseButton::Left),
        }
    }
}

/// Result of hit-testing one widget this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub hovered: bool,
    /// The pointer went down on this widget this frame.
    pub pressed: bool,
    /// This widget holds the pointer.
    pub active: bool,
    /// Released over the widget after being pressed on it.
    pub clicked: bool,
}

#[derive(Debug, Clone, Default)]
struct WindowState {
    collapsed: bool,
}

/// GUI singleton.
pub struct Gui {
    pub(crate) style: GuiStyle,
    pub(crate) pointer: PointerState,
    active: Option<String>,
    windows: HashMap<String, WindowState>,
    frame_rects: Vec<Rect>,
    last_rects: Vec<Rect>,
    commands: Vec<DrawCommand>,
    next_auto_y: f32,
}

impl Gui {
    pub fn new() -> Self {
        Self::with_style(GuiStyle::default())
    }

    pub fn with_style(style: GuiStyle) -> Self {
        let next_auto_y = style.origin[1];
        Self {
            style,
            pointer: PointerState::default(),
            active: None,
            windows: HashMap::new(),
            frame_rects: Vec::new(),
            last_rects: Vec::new(),
            commands: Vec::new(),
            next_auto_y,
        }
    }

    pub fn style(&self) -> &GuiStyle {
        &self.style
    }

    pub fn begin_frame(&mut self, input: &InputState) {
        self.pointer = PointerState::from_input(input);
        self.commands.clear();
        self.frame_rects.clear();
        self.next_auto_y = self.style.origin[1];
        // Pointer went up outside any frame we saw; nothing is held any more.
        if !self.pointer.down && !self.pointer.released {
            self.active = None;
        }
    }

    /// Finish the frame and hand back what to draw, in order.
    pub fn end_frame(&mut self) -> Vec<DrawCommand> {
        if self.pointer.released {
            self.active = None;
        }
        self.last_rects = std::mem::take(&mut self.frame_rects);
        std::mem::take(&mut self.commands)
    }

    /// Update the pointer position between frames, so `wants_mouse` is
    /// current for systems that run before `begin_frame`.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer.position = position;
    }

    /// True when the pointer is over a GUI window or a widget is being held.
    pub fn wants_mouse(&self) -> bool {
        self.active.is_some()
            || self
                .last_rects
                .iter()
                .chain(self.frame_rects.iter())
                .any(|r| r.contains(self.pointer.position))
    }

    /// Id of the widget holding the pointer, as `"<window>##<label>"`.
    pub fn active_widget(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Hit-test `rect` for widget `id`. The first widget pressed while
    /// nothing is held becomes active until the pointer is released.
    pub fn interact(&mut self, id: &str, rect: Rect) -> Interaction {
        let hovered = rect.contains(self.pointer.position);
        let mut pressed = false;
        if hovered && self.pointer.pressed && self.active.is_none() {
            self.active = Some(id.to_string());
            pressed = true;
        }
        let active = self.active.as_deref() == Some(id);
        Interaction {
            hovered,
            pressed,
            active,
            clicked: active && self.pointer.released && hovered,
        }
    }

    /// Auto-placed window. Returns false when closed or collapsed, in which
    /// case `body` is not called.
    pub fn window<F>(&mut self, title: &str, open: &mut bool, body: F) -> bool
    where
        F: FnOnce(&mut Ui<'_>),
    {
        self.window_impl(title, None, open, body)
    }

    /// Window with its top-left corner at `position`.
    pub fn window_at<F>(&mut self, title: &str, position: Vec2, open: &mut bool, body: F) -> bool
    where
        F: FnOnce(&mut Ui<'_>),
    {
        self.window_impl(title, Some(position), open, body)
    }

    pub fn is_collapsed(&self, title: &str) -> bool {
        self.windows.get(title).map(|w| w.collapsed).unwrap_or(false)
    }

    fn window_impl<F>(&mut self, title: &str, position: Option<Vec2>, open: &mut bool, body: F) -> bool
    where
        F: FnOnce(&mut Ui<'_>),
    {
        if !*open {
            return false;
        }
        let style = self.style.clone();
        let auto = position.is_none();
        let origin = position.unwrap_or(Vec2::new(style.origin[0], self.next_auto_y));

        let title_bar = Rect::new(origin.x, origin.y, style.window_width, style.title_height);
        let inset = 4.0;
        let close_box = Rect::new(
            title_bar.right() - style.title_height + inset,
            title_bar.y + inset,
            style.title_height - inset * 2.0,
            style.title_height - inset * 2.0,
        );

        let close = self.interact(&format!("{title}##close"), close_box);
        if close.clicked {
            log::debug!("gui window `{}` closed", title);
            *open = false;
            return false;
        }
        // The title bar outside the close box toggles collapse.
        let toggle = if close_box.contains(self.pointer.position) {
            Interaction::default()
        } else {
            self.interact(&format!("{title}##title"), title_bar)
        };
        let state = self.windows.entry(title.to_string()).or_default();
        if toggle.clicked {
            state.collapsed = !state.collapsed;
        }
        let collapsed = state.collapsed;

        let mut body_commands = Vec::new();
        let mut body_height = 0.0;
        if !collapsed {
            let content = Rect::new(
                origin.x + style.padding,
                title_bar.bottom() + style.padding,
                style.window_width - style.padding * 2.0,
                0.0,
            );
            let mut ui = Ui::new(self, title, content);
            body(&mut ui);
            let used = ui.finish(&mut body_commands);
            body_height = used + style.padding * 2.0;
        }

        let frame = Rect::new(origin.x, origin.y, style.window_width, style.title_height + body_height);
        if !collapsed {
            self.commands.push(DrawCommand::Rect {
                position: frame.position(),
                size: frame.size(),
                color: style.window_bg,
            });
        }
        self.commands.push(DrawCommand::Rect {
            position: title_bar.position(),
            size: title_bar.size(),
            color: style.title_bg,
        });
        self.commands.push(DrawCommand::Text {
            text: title.to_string(),
            position: Vec2::new(title_bar.x + style.padding, title_bar.y + (style.title_height - style.font_size) / 2.0),
            size: style.font_size,
            color: style.title_text,
        });
        self.commands.push(DrawCommand::RectLines {
            position: close_box.position(),
            size: close_box.size(),
            thickness: 1.0,
            color: if close.hovered { Color::WHITE } else { style.border },
        });
        self.commands.extend(body_commands);
        self.commands.push(DrawCommand::RectLines {
            position: frame.position(),
            size: frame.size(),
            thickness: 1.0,
            color: style.border,
        });

        self.frame_rects.push(frame);
        if auto {
            self.next_auto_y = frame.bottom() + style.spacing * 2.0;
        }
        !collapsed
    }
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}
