use glam::Vec2;

use crate::renderer::{Color, DrawCommand};

use super::context::{Gui, Interaction};
use super::rect::Rect;

/// Widget builder for the body of one window. Widgets are laid out top to
/// bottom, one per row.
pub struct Ui<'a> {
    gui: &'a mut Gui,
    window: &'a str,
    content: Rect,
    cursor_y: f32,
    commands: Vec<DrawCommand>,
}

impl<'a> Ui<'a> {
    pub(crate) fn new(gui: &'a mut Gui, window: &'a str, content: Rect) -> Self {
        Self {
            gui,
            window,
            cursor_y: content.y,
            content,
            commands: Vec::new(),
        }
    }

    /// Move the recorded commands into `out`; returns the height used.
    pub(crate) fn finish(self, out: &mut Vec<DrawCommand>) -> f32 {
        out.extend(self.commands);
        let used = self.cursor_y - self.content.y;
        (used - self.gui.style.spacing).max(0.0)
    }

    fn id(&self, label: &str) -> String {
        format!("{}##{}", self.window, label)
    }

    fn next_row(&mut self, height: f32) -> Rect {
        let row = Rect::new(self.content.x, self.cursor_y, self.content.w, height);
        self.cursor_y += height + self.gui.style.spacing;
        row
    }

    /// Rough width of `text` at the style's font size.
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.gui.style.font_size * 0.5
    }

    fn push_text(&mut self, text: impl Into<String>, x: f32, row: Rect) {
        let size = self.gui.style.font_size;
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position: Vec2::new(x, row.y + (row.h - size) / 2.0),
            size,
            color: self.gui.style.text,
        });
    }

    fn push_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect {
            position: rect.position(),
            size: rect.size(),
            color,
        });
    }

    fn widget_color(&self, i: Interaction) -> Color {
        let style = &self.gui.style;
        if i.active {
            style.widget_active
        } else if i.hovered {
            style.widget_hover
        } else {
            style.widget_bg
        }
    }

    pub fn text(&mut self, text: impl Into<String>) {
        let row = self.next_row(self.gui.style.font_size);
        let x = row.x;
        self.push_text(text, x, row);
    }

    pub fn separator(&mut self) {
        let row = self.next_row(1.0);
        let color = self.gui.style.border;
        self.push_rect(row, color);
    }

    /// Returns true on the frame the button is clicked.
    pub fn button(&mut self, label: &str) -> bool {
        let style_h = self.gui.style.widget_height;
        let pad = self.gui.style.padding;
        let row = self.next_row(style_h);
        let width = (self.text_width(label) + pad * 2.0).min(row.w);
        let rect = Rect::new(row.x, row.y, width, row.h);

        let id = self.id(label);
        let i = self.gui.interact(&id, rect);
        let color = self.widget_color(i);
        self.push_rect(rect, color);
        self.push_text(label, rect.x + pad, rect);
        i.clicked
    }

    /// Toggles `value` when clicked. Returns true if it changed.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let row = self.next_row(self.gui.style.widget_height);
        let id = self.id(label);
        let i = self.gui.interact(&id, row);
        if i.clicked {
            *value = !*value;
        }

        let check = Rect::new(row.x, row.y, row.h, row.h);
        let color = self.widget_color(i);
        self.push_rect(check, color);
        if *value {
            let accent = self.gui.style.accent;
            self.push_rect(check.pad(4.0), accent);
        }
        let x = check.right() + self.gui.style.spacing * 2.0;
        self.push_text(label, x, row);
        i.clicked
    }

    /// Horizontal slider. Dragging sets `value` from the pointer position;
    /// the value is always kept inside `[min, max]`. Returns true if it changed.
    pub fn slider_f32(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let row = self.next_row(self.gui.style.widget_height);
        let (bar, label_area) = row.split_h(0.65);
        let id = self.id(label);
        let changed = self.drag_value(&id, bar, value, min, max);

        let (lo, hi) = (min.min(max), min.max(max));
        let t = if hi > lo { (*value - lo) / (hi - lo) } else { 0.0 };
        self.draw_bar(&id, bar, t, format!("{:.3}", value));
        let x = label_area.x + self.gui.style.spacing * 2.0;
        self.push_text(label, x, row);
        changed
    }

    /// Three 0..1 channel sliders and a swatch. Returns true if any channel changed.
    pub fn color_edit3(&mut self, label: &str, rgb: &mut [f32; 3]) -> bool {
        let row = self.next_row(self.gui.style.widget_height);
        let (fields, label_area) = row.split_h(0.65);
        let gap = self.gui.style.spacing;
        let swatch = Rect::new(fields.right() - fields.h, fields.y, fields.h, fields.h);
        let channel_w = (swatch.x - fields.x - gap * 3.0) / 3.0;

        let mut changed = false;
        for (i, name) in ["R", "G", "B"].into_iter().enumerate() {
            let bar = Rect::new(fields.x + i as f32 * (channel_w + gap), fields.y, channel_w, fields.h);
            let id = format!("{}/{}", self.id(label), name);
            changed |= self.drag_value(&id, bar, &mut rgb[i], 0.0, 1.0);
            let value = rgb[i];
            self.draw_bar(&id, bar, value, format!("{}:{}", name, (value * 255.0).round() as u8));
        }
        self.push_rect(swatch, Color::from_f32(*rgb));
        let x = label_area.x + gap * 2.0;
        self.push_text(label, x, row);
        changed
    }

    fn drag_value(&mut self, id: &str, bar: Rect, value: &mut f32, min: f32, max: f32) -> bool {
        let (lo, hi) = (min.min(max), min.max(max));
        let before = *value;
        *value = value.clamp(lo, hi);

        let i = self.gui.interact(id, bar);
        if i.active && (self.gui.pointer.down || i.pressed) && bar.w > 0.0 {
            let t = ((self.gui.pointer.position.x - bar.x) / bar.w).clamp(0.0, 1.0);
            *value = lo + t * (hi - lo);
        }
        *value != before
    }

    fn draw_bar(&mut self, id: &str, bar: Rect, t: f32, caption: String) {
        let active = self.gui.active_widget() == Some(id);
        let hovered = bar.contains(self.gui.pointer.position);
        let color = self.widget_color(Interaction {
            hovered,
            active,
            ..Default::default()
        });
        self.push_rect(bar, color);

        let grab_w = 8.0_f32.min(bar.w);
        let grab_x = bar.x + (bar.w - grab_w) * t.clamp(0.0, 1.0);
        let accent = self.gui.style.accent;
        self.push_rect(Rect::new(grab_x, bar.y + 2.0, grab_w, (bar.h - 4.0).max(0.0)), accent);

        let x = bar.x + (bar.w - self.text_width(&caption)) / 2.0;
        self.push_text(caption, x, bar);
    }
}
