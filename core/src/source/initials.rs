use avatar_stack_types::{Color, TextStyle, stack_colors};

use crate::geometry::Circle;
use crate::render::{Drawable, Painter};

/// Text initials on a filled disc.
///
/// The stock drawable for hosts that have no richer avatar content.
#[derive(Debug, Clone, PartialEq)]
pub struct Initials {
    pub text: String,
    pub fill: Color,
    pub style: TextStyle,
}

impl Initials {
    pub fn new(text: impl Into<String>, fill: Color) -> Self {
        Self {
            text: text.into(),
            fill,
            style: TextStyle {
                color: stack_colors::WHITE,
                ..Default::default()
            },
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

impl Drawable for Initials {
    fn paint(&self, painter: &mut dyn Painter, clip: Circle) {
        painter.fill_circle(clip, self.fill);
        if !self.text.is_empty() {
            painter.draw_centered_text(&self.text, clip.center, &self.style);
        }
    }
}
