use crate::renderer::Color;

/// Sizes and colors used to lay out and draw GUI windows.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiStyle {
    pub font_size: f32,
    pub padding: f32,
    pub spacing: f32,
    pub title_height: f32,
    pub widget_height: f32,
    pub window_width: f32,
    /// Where the first auto-placed window goes.
    pub origin: [f32; 2],
    pub window_bg: Color,
    pub title_bg: Color,
    pub title_text: Color,
    pub text: Color,
    pub widget_bg: Color,
    pub widget_hover: Color,
    pub widget_active: Color,
    pub accent: Color,
    pub border: Color,
}

impl Default for GuiStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            padding: 8.0,
            spacing: 4.0,
            title_height: 22.0,
            widget_height: 20.0,
            window_width: 320.0,
            origin: [60.0, 60.0],
            window_bg: Color::rgba(15, 15, 15, 240),
            title_bg: Color::rgb(41, 74, 122),
            title_text: Color::WHITE,
            text: Color::rgb(230, 230, 230),
            widget_bg: Color::rgb(41, 58, 82),
            widget_hover: Color::rgb(66, 150, 250),
            widget_active: Color::rgb(15, 135, 250),
            accent: Color::rgb(66, 150, 250),
            border: Color::rgb(110, 110, 128),
        }
    }
}
