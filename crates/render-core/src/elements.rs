//! Drawable primitives produced by the grid layout.
//!
//! Coordinates are resolved in layout space: text is already aligned within its cell,
//! so a renderer only has to flip the y axis and emit operators.

use quotegrid_types::{Color, Rect};

/// A drawable element with its box on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn new(rect: Rect, element: LayoutElement) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            element,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.element {
            LayoutElement::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
    /// A straight rule from `(x, y)` to `(x + width, y + height)`.
    Line(Stroke),
    Image(ImageElement),
}

impl std::fmt::Display for LayoutElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutElement::Text(t) => write!(f, "Text(\"{}\")", t.content),
            LayoutElement::Rectangle(_) => write!(f, "Rectangle"),
            LayoutElement::Line(_) => write!(f, "Line"),
            LayoutElement::Image(i) => write!(f, "Image(src=\"{}\")", i.src),
        }
    }
}

/// Which face of the document font a run of text uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontRole {
    #[default]
    Regular,
    Bold,
}

/// A single line of text. The box height equals the font size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: FontRole,
    pub font_size: f32,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

/// Cell backgrounds and borders.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectElement {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// Key of an image registered with the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageElement {
    pub src: String,
}

/// Width of rendered text, as the output font will lay it out.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, font: FontRole, font_size: f32) -> f32;

    /// Shortens `text` with a trailing `...` until it fits in `max_width`.
    fn fit_text(&self, text: &str, font: FontRole, font_size: f32, max_width: f32) -> String {
        if self.text_width(text, font, font_size) <= max_width {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate: String = chars.iter().collect::<String>().trim_end().to_string() + "...";
            if self.text_width(&candidate, font, font_size) <= max_width {
                return candidate;
            }
        }
        String::new()
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn text_width(&self, text: &str, font: FontRole, font_size: f32) -> f32 {
        (**self).text_width(text, font, font_size)
    }
}
