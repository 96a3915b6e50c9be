//! Content stream generation for one page.

use crate::fonts::{EmbeddedFont, FontSet, GlyphUsage, PdfFont, to_win_ansi};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use quotegrid_render_core::utils::{baseline_y, flip_y};
use quotegrid_render_core::{
    ImageElement, LayoutElement, PositionedElement, RectElement, RenderError, Stroke, TextElement,
};
use quotegrid_types::Color;
use std::collections::BTreeMap;

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font_name: &'static str,
    font_size: f32,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

fn color_operands(color: Color) -> Vec<Object> {
    color.to_unit_rgb().into_iter().map(Object::Real).collect()
}

pub(crate) struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: PageRenderState,
    fonts: &'a FontSet,
    usage: &'a mut GlyphUsage,
    /// Image `src` to XObject resource name.
    images: &'a BTreeMap<String, String>,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        page_height: f32,
        fonts: &'a FontSet,
        usage: &'a mut GlyphUsage,
        images: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
            fonts,
            usage,
            images,
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Rectangle(rect) => {
                self.draw_rect(rect, el);
                Ok(())
            }
            LayoutElement::Line(stroke) => {
                self.draw_line(stroke, el);
                Ok(())
            }
            LayoutElement::Image(image) => self.draw_image(image, el),
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            self.op("rg", color_operands(color));
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        if self.state.line_width != Some(stroke.width) {
            self.op("w", vec![stroke.width.into()]);
            self.state.line_width = Some(stroke.width);
        }
        if self.state.stroke_color != Some(stroke.color) {
            self.op("RG", color_operands(stroke.color));
            self.state.stroke_color = Some(stroke.color);
        }
    }

    fn draw_rect(&mut self, rect: &RectElement, el: &PositionedElement) {
        let y = flip_y(el.y + el.height, self.page_height);
        let bounds = || vec![el.x.into(), y.into(), el.width.into(), el.height.into()];
        if let Some(fill) = rect.fill {
            self.set_fill_color(fill);
            self.op("re", bounds());
            self.op("f", vec![]);
        }
        if let Some(stroke) = &rect.stroke {
            self.set_stroke(stroke);
            self.op("re", bounds());
            self.op("S", vec![]);
        }
    }

    fn draw_line(&mut self, stroke: &Stroke, el: &PositionedElement) {
        self.set_stroke(stroke);
        let y1 = flip_y(el.y, self.page_height);
        let y2 = flip_y(el.y + el.height, self.page_height);
        self.op("m", vec![el.x.into(), y1.into()]);
        self.op("l", vec![(el.x + el.width).into(), y2.into()]);
        self.op("S", vec![]);
    }

    fn set_font(&mut self, name: &'static str, size: f32) {
        if self.state.font_name != name || self.state.font_size != size {
            self.op("Tf", vec![Object::Name(name.as_bytes().to_vec()), size.into()]);
            self.state.font_name = name;
            self.state.font_size = size;
        }
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) -> Result<(), RenderError> {
        if text.content.trim().is_empty() {
            return Ok(());
        }
        let fonts = self.fonts;
        let name = fonts.resource_name(text.font);
        let x = el.x;
        let y = flip_y(baseline_y(el.y, text.font_size), self.page_height);

        self.op("BT", vec![]);
        self.set_font(name, text.font_size);
        self.set_fill_color(text.color);
        match fonts.face(text.font) {
            PdfFont::Standard(_) => self.show_win_ansi(&text.content, x, y),
            PdfFont::Embedded(font) => self.show_shaped(font, name, text, x, y),
        }
        self.op("ET", vec![]);
        Ok(())
    }

    fn show_win_ansi(&mut self, content: &str, x: f32, y: f32) {
        self.op("Td", vec![x.into(), y.into()]);
        self.op("Tj", vec![Object::String(to_win_ansi(content), StringFormat::Literal)]);
    }

    /// Emits shaped glyphs. Runs of unmarked glyphs share one `TJ`, with kerning as
    /// position adjustments; glyphs carrying an offset (combining marks) are placed one
    /// by one.
    fn show_shaped(&mut self, font: &EmbeddedFont, name: &'static str, text: &TextElement, x: f32, y: f32) {
        let glyphs = font.shape(&text.content);
        let scale = text.font_size / font.units_per_em() as f32;
        let nominal: BTreeMap<u16, u16> = font
            .glyph_advances(glyphs.iter().map(|g| g.id))
            .into_iter()
            .collect();

        let mut clusters: Vec<usize> = glyphs.iter().map(|g| g.cluster as usize).collect();
        clusters.sort_unstable();
        clusters.dedup();
        let cluster_text = |start: usize| {
            let end = clusters
                .iter()
                .find(|c| **c > start)
                .copied()
                .unwrap_or(text.content.len());
            text.content.get(start..end).unwrap_or("")
        };

        let mut pen = 0.0_f32;
        let mut run: Vec<Object> = Vec::new();
        let mut run_start = 0.0_f32;
        let mut seen_clusters = Vec::new();

        for glyph in &glyphs {
            let mapped = if seen_clusters.contains(&glyph.cluster) {
                ""
            } else {
                seen_clusters.push(glyph.cluster);
                cluster_text(glyph.cluster as usize)
            };
            self.usage.record(name, glyph.id, mapped);

            let code = Object::String(glyph.id.to_be_bytes().to_vec(), StringFormat::Hexadecimal);
            if glyph.x_offset != 0 || glyph.y_offset != 0 {
                self.flush_run(&mut run, x + run_start, y);
                let gx = x + pen + glyph.x_offset as f32 * scale;
                let gy = y + glyph.y_offset as f32 * scale;
                self.op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), gx.into(), gy.into()]);
                self.op("Tj", vec![code]);
            } else {
                if run.is_empty() {
                    run_start = pen;
                }
                run.push(code);
                let nominal_advance = nominal.get(&glyph.id).copied().unwrap_or(0) as i32;
                let adjust = font.to_pdf_units(nominal_advance - glyph.x_advance);
                if adjust.abs() > 0.01 {
                    run.push(Object::Real(adjust));
                }
            }
            pen += glyph.x_advance as f32 * scale;
        }
        self.flush_run(&mut run, x + run_start, y);
    }

    fn flush_run(&mut self, run: &mut Vec<Object>, x: f32, y: f32) {
        if run.is_empty() {
            return;
        }
        self.op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()]);
        self.op("TJ", vec![Object::Array(std::mem::take(run))]);
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) -> Result<(), RenderError> {
        let name = self
            .images
            .get(&image.src)
            .ok_or_else(|| RenderError::Other(format!("Image not registered: {}", image.src)))?
            .clone();
        let y = flip_y(el.y + el.height, self.page_height);
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![el.width.into(), 0.into(), 0.into(), el.height.into(), el.x.into(), y.into()],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.op("Q", vec![]);
        Ok(())
    }
}
